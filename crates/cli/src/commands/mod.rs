pub(crate) mod interview;
pub(crate) mod journal;
pub(crate) mod serve;
