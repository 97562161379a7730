use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Category assigned to records that arrive without one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
/// Description assigned to records that arrive without one.
pub const DEFAULT_DESCRIPTION: &str = "No description";
/// Display label for records not tied to any account.
pub const MISSING_ACCOUNT_LABEL: &str = "N/A";

// Raw input records, as stored in the document store. Every field is loosely
// typed; normalization is the single seam where they become FinancialRecord.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
	#[serde(default)]
	pub date: Value,
	#[serde(default)]
	pub amount: Value,
	#[serde(default)]
	pub category: Value,
	#[serde(default, alias = "accountId")]
	pub account_id: Value,
	#[serde(default)]
	pub description: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
	Expense,
	Earning,
}

impl RecordKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			RecordKind::Expense => "expense",
			RecordKind::Earning => "earning",
		}
	}
}

impl fmt::Display for RecordKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for RecordKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"expense" | "expenses" => Ok(RecordKind::Expense),
			"earning" | "earnings" => Ok(RecordKind::Earning),
			other => Err(format!("unknown record kind '{other}'")),
		}
	}
}

/// A normalized expense or earning. `date: None` marks a record whose raw
/// date could not be parsed; it fails every range comparison but is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
	pub date: Option<NaiveDate>,
	pub amount: f64,
	pub category: String,
	pub account_id: Option<String>,
	pub description: String,
}

impl FinancialRecord {
	pub fn year_month(&self) -> Option<(i32, u32)> {
		self.date.map(|d| (d.year(), d.month()))
	}
}

/// Inclusive date window. Construction rejects `start > end` instead of
/// swapping the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
	pub start: NaiveDate,
	pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDateRange {
	pub start: NaiveDate,
	pub end: NaiveDate,
}

impl fmt::Display for InvalidDateRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "start date {} is after end date {}", self.start, self.end)
	}
}

impl std::error::Error for InvalidDateRange {}

impl DateRange {
	pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
		if start > end {
			Err(InvalidDateRange { start, end })
		} else {
			Ok(DateRange { start, end })
		}
	}

	pub fn contains(&self, date: NaiveDate) -> bool {
		self.start <= date && date <= self.end
	}
}

/// Set of `(year, month)` pairs keyed as `"YYYY-M"` (1-based month) with a
/// boolean flag each. A selection with no true flag reads as "all months"
/// on the runway path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthSelection {
	flags: HashMap<String, bool>,
}

impl MonthSelection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn key(year: i32, month: u32) -> String {
		format!("{year}-{month}")
	}

	pub fn from_keys<I, S>(keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let flags = keys.into_iter().map(|k| (k.into(), true)).collect();
		MonthSelection { flags }
	}

	pub fn set(&mut self, year: i32, month: u32, selected: bool) {
		self.flags.insert(Self::key(year, month), selected);
	}

	pub fn is_unconstrained(&self) -> bool {
		!self.flags.values().any(|&on| on)
	}

	pub fn selected_count(&self) -> usize {
		self.selected().count()
	}

	pub fn contains(&self, year: i32, month: u32) -> bool {
		self.selected().any(|(y, m)| y == year && m == month)
	}

	/// Iterates selected `(year, month)` pairs; malformed keys are ignored.
	pub fn selected(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
		self.flags
			.iter()
			.filter(|&(_, &on)| on)
			.filter_map(|(key, _)| parse_month_key(key))
	}
}

fn parse_month_key(key: &str) -> Option<(i32, u32)> {
	let (year, month) = key.rsplit_once('-')?;
	Some((year.parse().ok()?, month.parse().ok()?))
}

/// Category → summed amount, keeping categories in first-occurrence order.
/// Recomputed from scratch whenever the filtered record set changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
	entries: Vec<(String, f64)>,
	index: HashMap<String, usize>,
}

impl CategoryTotals {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, category: &str, amount: f64) {
		match self.index.get(category) {
			Some(&i) => self.entries[i].1 += amount,
			None => {
				self.index.insert(category.to_string(), self.entries.len());
				self.entries.push((category.to_string(), amount));
			}
		}
	}

	pub fn get(&self, category: &str) -> Option<f64> {
		self.index.get(category).map(|&i| self.entries[i].1)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
		self.entries.iter().map(|(name, total)| (name.as_str(), *total))
	}

	pub fn total(&self) -> f64 {
		self.entries.iter().map(|(_, total)| total).sum()
	}
}

// Chart and table view models, shaped for the renderers' contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
	pub name: String,
	pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartViewModel {
	pub slices: Vec<ChartSlice>,
	pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
	pub label: String,
	pub data: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarChartViewModel {
	pub labels: Vec<String>,
	pub datasets: Vec<BarSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
	#[serde(rename = "type")]
	pub kind: RecordKind,
	pub category: String,
	pub date: String,
	pub amount: f64,
	pub account: String,
	pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunwaySummary {
	pub total_expenses: f64,
	pub total_earnings: f64,
	pub profit_loss: f64,
	pub month_count: u32,
	pub avg_monthly_expense: f64,
	pub months_of_runway: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialOverview {
	pub total_expenses: f64,
	pub total_earnings: f64,
	pub profit_loss: f64,
	pub expenses_by_category: ChartViewModel,
	pub earnings_by_category: ChartViewModel,
	pub chart_year: i32,
	pub monthly: BarChartViewModel,
	pub runway: RunwaySummary,
	pub account_ids: Vec<String>,
	pub years: Vec<i32>,
}

// Directory entities managed by the CRUD screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
	#[serde(default)]
	pub account_id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub institution: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
	#[serde(default)]
	pub client_id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub company: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
	#[serde(default)]
	pub project_id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
}

// Application settings (settings.json)
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
	#[serde(default = "default_database_path")]
	pub database_path: String,
	#[serde(default)]
	pub default_chart_year: Option<i32>,
	#[serde(default = "default_debounce_ms")]
	pub debounce_ms: u64,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			host: default_host(),
			port: default_port(),
			database_path: default_database_path(),
			default_chart_year: None,
			debounce_ms: default_debounce_ms(),
		}
	}
}

fn default_host() -> String {
	"127.0.0.1".to_string()
}

fn default_port() -> u16 {
	3000
}

fn default_database_path() -> String {
	"database/database.json".to_string()
}

fn default_debounce_ms() -> u64 {
	400
}
