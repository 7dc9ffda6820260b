//! Identifier columns rewritten per benchmark table
//!
//! Data generation applies the codec to exactly these columns. TPC-DS date
//! and time surrogate keys are left as integers.

use crate::common::error::{KeyBenchError, KeyBenchResult};
use std::fmt;
use std::str::FromStr;

/// Benchmark families with a key column catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Benchmark {
    Tpch,
    Tpcds,
}

pub const TPCH_KEY_COLUMNS: &[(&str, &[&str])] = &[
    ("part", &["p_partkey"]),
    ("region", &["r_regionkey"]),
    ("nation", &["n_nationkey", "n_regionkey"]),
    ("supplier", &["s_suppkey", "s_nationkey"]),
    ("partsupp", &["ps_partkey", "ps_suppkey"]),
    ("customer", &["c_custkey", "c_nationkey"]),
    ("orders", &["o_orderkey", "o_custkey"]),
    ("lineitem", &["l_orderkey", "l_partkey", "l_suppkey"]),
];

pub const TPCDS_KEY_COLUMNS: &[(&str, &[&str])] = &[
    ("customer_address", &["ca_address_sk"]),
    ("customer_demographics", &["cd_demo_sk"]),
    ("date_dim", &["d_date_sk"]),
    ("warehouse", &["w_warehouse_sk"]),
    ("ship_mode", &["sm_ship_mode_sk"]),
    ("time_dim", &["t_time_sk"]),
    ("reason", &["r_reason_sk"]),
    ("income_band", &["ib_income_band_sk"]),
    ("household_demographics", &["hd_demo_sk"]),
    ("item", &["i_item_sk"]),
    ("store", &["s_store_sk"]),
    ("call_center", &["cc_call_center_sk"]),
    ("customer", &["c_customer_sk"]),
    ("web_site", &["web_site_sk"]),
    ("web_page", &["wp_web_page_sk"]),
    ("promotion", &["p_promo_sk"]),
    ("catalog_page", &["cp_catalog_page_sk"]),
    ("inventory", &["inv_date_sk", "inv_item_sk", "inv_warehouse_sk"]),
    ("web_sales", &["ws_item_sk", "ws_order_number"]),
    ("catalog_sales", &["cs_item_sk", "cs_order_number"]),
    ("store_sales", &["ss_item_sk", "ss_ticket_number"]),
    ("web_returns", &["wr_item_sk", "wr_order_number"]),
    ("catalog_returns", &["cr_item_sk", "cr_order_number"]),
    ("store_returns", &["sr_item_sk", "sr_ticket_number"]),
];

impl Benchmark {
    pub fn name(&self) -> &'static str {
        match self {
            Benchmark::Tpch => "tpch",
            Benchmark::Tpcds => "tpcds",
        }
    }

    /// Table → key columns catalogue for this benchmark
    pub fn key_columns(&self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            Benchmark::Tpch => TPCH_KEY_COLUMNS,
            Benchmark::Tpcds => TPCDS_KEY_COLUMNS,
        }
    }

    /// Tables that carry at least one rewritten column
    pub fn tables(&self) -> impl Iterator<Item = &'static str> {
        self.key_columns().iter().map(|(table, _)| *table)
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Benchmark {
    type Err = KeyBenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tpch" => Ok(Benchmark::Tpch),
            "tpcds" => Ok(Benchmark::Tpcds),
            other => Err(KeyBenchError::InvalidArgument(format!(
                "Unknown benchmark '{}'",
                other
            ))),
        }
    }
}

/// Key columns of `table`; empty for tables without rewritten columns
pub fn key_columns(benchmark: Benchmark, table: &str) -> &'static [&'static str] {
    benchmark
        .key_columns()
        .iter()
        .find(|(name, _)| *name == table)
        .map(|(_, columns)| *columns)
        .unwrap_or(&[])
}

pub fn is_key_column(benchmark: Benchmark, table: &str, column: &str) -> bool {
    key_columns(benchmark, table).contains(&column)
}

/// Key columns of `table`, failing for tables the benchmark does not define
pub fn require_key_columns(
    benchmark: Benchmark,
    table: &str,
) -> KeyBenchResult<&'static [&'static str]> {
    benchmark
        .key_columns()
        .iter()
        .find(|(name, _)| *name == table)
        .map(|(_, columns)| *columns)
        .ok_or_else(|| {
            KeyBenchError::InvalidArgument(format!("{} has no table '{}'", benchmark, table))
        })
}
