pub mod notation;

pub use linkgram_count::{
    COUNT_SATURATION, CountContext, PARSE_NUM_OVERFLOW, ResourceGuard, do_parse,
    first_parsable_null_count,
};
pub use linkgram_match::{MatchIndex, MatchList, do_match, easy_match};
pub use linkgram_types::{
    Connector, ConnectorId, ConnectorSpec, Direction, Disjunct, DisjunctId, ParseOptions,
    Priority, Sentence, UNLIMITED_LEN, Word,
};
