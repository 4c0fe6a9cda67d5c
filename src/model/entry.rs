use crate::model::amount::parse_currency;
use crate::model::fields::{parse_calendar_date, parse_duration_seconds};
use crate::model::Amount;
use crate::Result;
use anyhow::bail;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A row read from a CSV file before it is turned into an `Entry`: header name to value, where
/// empty cells are `None`. The order of the pairs is the order of the header row.
pub type RawRecord = Vec<(String, Option<String>)>;

/// One normalized work-log row.
///
/// The semantic fields are kept as the text that was uploaded. Parsing into numbers and dates
/// happens on every aggregation pass through [`Entry::hours`], [`Entry::earnings`] and
/// [`Entry::date`], which never fail.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Entry {
    item_id: Option<String>,
    work_date: Option<String>,
    duration: Option<String>,
    payout: Option<String>,
    project_name: Option<String>,
    pay_type: Option<String>,
    /// Columns the engine does not use, carried along unchanged.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    other_fields: BTreeMap<String, String>,
}

impl Entry {
    /// Builds an entry from the header/value pairs of a parsed row.
    pub fn from_record(record: &RawRecord) -> Self {
        let mut entry = Entry::default();
        for (header, value) in record {
            entry.set_with_header(header, value.clone());
        }
        entry
    }

    /// Given the `header` name and the `value`, set the appropriate field. Unknown headers are
    /// kept in `other_fields`.
    pub fn set_with_header(&mut self, header: impl AsRef<str>, value: Option<String>) {
        let header = header.as_ref();
        let value = value.filter(|v| !v.trim().is_empty());
        match EntryColumn::from_header(header) {
            Ok(col) => match col {
                EntryColumn::ItemId => self.item_id = value,
                EntryColumn::WorkDate => self.work_date = value,
                EntryColumn::Duration => self.duration = value,
                EntryColumn::Payout => self.payout = value,
                EntryColumn::ProjectName => self.project_name = value,
                EntryColumn::PayType => self.pay_type = value,
            },
            Err(_) => {
                if let Some(v) = value {
                    let _ = self.other_fields.insert(header.to_string(), v);
                }
            }
        }
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn work_date(&self) -> Option<&str> {
        self.work_date.as_deref()
    }

    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    pub fn payout(&self) -> Option<&str> {
        self.payout.as_deref()
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn pay_type(&self) -> Option<&str> {
        self.pay_type.as_deref()
    }

    pub fn other_fields(&self) -> &BTreeMap<String, String> {
        &self.other_fields
    }

    /// True when at least one of the identifying fields (work date, item id, duration, payout) is
    /// present.
    pub fn has_identifying_field(&self) -> bool {
        self.work_date.is_some()
            || self.item_id.is_some()
            || self.duration.is_some()
            || self.payout.is_some()
    }

    /// The key that must be unique across an entry collection.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            item_id: self.item_id.clone(),
            work_date: self.work_date.clone(),
        }
    }

    /// The calendar date of the work, `None` if missing or unparseable.
    pub fn date(&self) -> Option<NaiveDate> {
        self.work_date.as_deref().and_then(parse_calendar_date)
    }

    /// Seconds of work; zero if missing or malformed.
    pub fn seconds(&self) -> i64 {
        self.duration.as_deref().map(parse_duration_seconds).unwrap_or(0)
    }

    /// Hours of work; zero if missing or malformed.
    pub fn hours(&self) -> f64 {
        self.seconds() as f64 / 3600.0
    }

    /// Payout; zero if missing or malformed.
    pub fn earnings(&self) -> Amount {
        self.payout
            .as_deref()
            .map(|p| Amount::new(parse_currency(p)))
            .unwrap_or_default()
    }
}

/// The identity of an entry for the purposes of deduplication: item id plus work date, exactly as
/// they were written in the upload.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct IdentityKey {
    item_id: Option<String>,
    work_date: Option<String>,
}

impl IdentityKey {
    /// A key with neither part cannot identify anything.
    pub fn is_empty(&self) -> bool {
        self.item_id.is_none() && self.work_date.is_none()
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.item_id.as_deref().unwrap_or("null"),
            self.work_date.as_deref().unwrap_or("null")
        )
    }
}

/// The columns of a work-log export that the engine understands.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum EntryColumn {
    #[serde(rename = "itemID")]
    ItemId,
    #[serde(rename = "workDate")]
    WorkDate,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "payout")]
    Payout,
    #[serde(rename = "projectName")]
    ProjectName,
    #[serde(rename = "payType")]
    PayType,
}

serde_plain::derive_display_from_serialize!(EntryColumn);
serde_plain::derive_fromstr_from_deserialize!(EntryColumn);

impl EntryColumn {
    pub fn from_header(header: impl AsRef<str>) -> Result<EntryColumn> {
        match header.as_ref() {
            ITEM_ID_STR => Ok(EntryColumn::ItemId),
            WORK_DATE_STR => Ok(EntryColumn::WorkDate),
            DURATION_STR => Ok(EntryColumn::Duration),
            PAYOUT_STR => Ok(EntryColumn::Payout),
            PROJECT_NAME_STR => Ok(EntryColumn::ProjectName),
            PAY_TYPE_STR => Ok(EntryColumn::PayType),
            bad => bail!("Unrecognized work-log column '{bad}'"),
        }
    }
}

pub(crate) const ITEM_ID_STR: &str = "itemID";
pub(crate) const WORK_DATE_STR: &str = "workDate";
pub(crate) const DURATION_STR: &str = "duration";
pub(crate) const PAYOUT_STR: &str = "payout";
pub(crate) const PROJECT_NAME_STR: &str = "projectName";
pub(crate) const PAY_TYPE_STR: &str = "payType";
