use compact_str::CompactString;

pub type IdentName = CompactString;
