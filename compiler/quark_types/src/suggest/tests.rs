use super::*;

#[test]
fn distances() {
    assert_eq!(edit_distance("hello", "hello"), 0);
    assert_eq!(edit_distance("hello", "helo"), 1);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("abc", ""), 3);
}

#[test]
fn picks_closest_candidate() {
    let candidates = ["length", "height", "width"];
    assert_eq!(suggest_similar("lenght", candidates), Some("length"));
    assert_eq!(suggest_similar("widht", candidates), Some("width"));
}

#[test]
fn rejects_distant_candidates() {
    assert_eq!(suggest_similar("x", ["counter", "total"]), None);
    assert_eq!(suggest_similar("", ["a"]), None);
}

#[test]
fn exact_match_is_not_a_suggestion() {
    assert_eq!(suggest_similar("count", ["count"]), None);
}

#[test]
fn ties_are_deterministic() {
    assert_eq!(suggest_similar("cat", ["cot", "cut", "bat"]), Some("bat"));
    assert_eq!(suggest_similar("cat", ["cut", "bat", "cot"]), Some("bat"));
}
