//! Compilation targets.

use std::fmt;
use std::str::FromStr;

use crate::CodegenError;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Target {
    #[default]
    X86_64LinuxGnu,
}

impl Target {
    pub const fn triple(self) -> &'static str {
        match self {
            Target::X86_64LinuxGnu => "x86_64-unknown-linux-gnu",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.triple())
    }
}

impl FromStr for Target {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86_64-unknown-linux-gnu" | "x86_64-linux-gnu" => Ok(Target::X86_64LinuxGnu),
            other => Err(CodegenError::UnsupportedTarget(other.to_string())),
        }
    }
}
