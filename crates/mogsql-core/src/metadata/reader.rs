//! Metadata reader traits.
//!
//! A driver implements whichever readers its backend supports. [`Reader`] is
//! the full set, implemented automatically for any type providing all eight.

use asupersync::{Cx, Outcome};
use std::future::Future;

use super::filter::Filter;
use super::records::{
    CatalogInfo, ColumnInfo, ColumnStatInfo, IndexColumnInfo, IndexInfo, SchemaInfo, TableInfo,
    TriggerInfo,
};
use super::set::ResultSet;
use crate::error::Error;

pub trait CatalogReader: Send + Sync {
    fn catalogs(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> impl Future<Output = Outcome<ResultSet<CatalogInfo>, Error>> + Send;
}

pub trait SchemaReader: Send + Sync {
    fn schemas(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> impl Future<Output = Outcome<ResultSet<SchemaInfo>, Error>> + Send;
}

pub trait TableReader: Send + Sync {
    fn tables(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> impl Future<Output = Outcome<ResultSet<TableInfo>, Error>> + Send;
}

pub trait ColumnReader: Send + Sync {
    fn columns(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> impl Future<Output = Outcome<ResultSet<ColumnInfo>, Error>> + Send;
}

pub trait ColumnStatReader: Send + Sync {
    /// Statistics for the columns of the table named by `filter.parent`.
    fn column_stats(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> impl Future<Output = Outcome<ResultSet<ColumnStatInfo>, Error>> + Send;
}

pub trait IndexReader: Send + Sync {
    fn indexes(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> impl Future<Output = Outcome<ResultSet<IndexInfo>, Error>> + Send;
}

pub trait IndexColumnReader: Send + Sync {
    fn index_columns(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> impl Future<Output = Outcome<ResultSet<IndexColumnInfo>, Error>> + Send;
}

pub trait TriggerReader: Send + Sync {
    fn triggers(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> impl Future<Output = Outcome<ResultSet<TriggerInfo>, Error>> + Send;
}

/// Every metadata reader.
pub trait Reader:
    CatalogReader
    + SchemaReader
    + TableReader
    + ColumnReader
    + ColumnStatReader
    + IndexReader
    + IndexColumnReader
    + TriggerReader
{
}

impl<T> Reader for T where
    T: CatalogReader
        + SchemaReader
        + TableReader
        + ColumnReader
        + ColumnStatReader
        + IndexReader
        + IndexColumnReader
        + TriggerReader
{
}
