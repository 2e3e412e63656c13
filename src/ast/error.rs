use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AstError {
    #[error("Expected a node object but got {0}.")]
    NotANode(&'static str),
    #[error("Node `{node}` is missing the key `{key}`.")]
    MissingKey {
        node: CompactString,
        key: &'static str,
    },
    #[error("Key `{key}` of node `{node}` should be {expected}.")]
    WrongType {
        node: CompactString,
        key: &'static str,
        expected: &'static str,
    },
}
