use quark_diagnostic::InternalCompilerFault;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Fault(#[from] InternalCompilerFault),
    #[error("unsupported target `{0}`; the only supported target is x86_64-unknown-linux-gnu")]
    UnsupportedTarget(String),
}
