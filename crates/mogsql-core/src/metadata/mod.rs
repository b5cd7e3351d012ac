//! Database metadata: the records drivers produce, the filters and reader
//! traits that produce them, and the writer that prints them.

pub mod filter;
pub mod reader;
pub mod records;
pub mod set;
pub mod writer;

pub use filter::{Filter, ReaderOptions, parse_pattern};
pub use reader::{
    CatalogReader, ColumnReader, ColumnStatReader, IndexColumnReader, IndexReader, Reader,
    SchemaReader, TableReader, TriggerReader,
};
pub use records::{
    CatalogInfo, ColumnInfo, ColumnStatInfo, IndexColumnInfo, IndexInfo, Record, SchemaInfo,
    TableInfo, TriggerInfo,
};
pub use set::ResultSet;
pub use writer::{DefaultWriter, Format, Writer};
