use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Raw record from the onboarding CSV export.
///
/// Every column is read as text; coercion happens in [`CsvRecord::into_record`].
#[derive(Debug, Deserialize)]
pub struct CsvRecord {
    pub supplier_name: Option<String>,
    #[serde(alias = "onboard_date_v2")]
    pub onboard_date: Option<String>,
    pub cw_num: Option<String>,
    pub sla_end_to_end_exclude_weekend1: Option<String>,
    pub wo_adv_std_exclude_weekend: Option<String>,
    pub complaince_activation_exclude_weekend: Option<String>,
    pub xws_activation_to_idv: Option<String>,
    pub xws_idv_to_system_activation: Option<String>,
}

/// One of the five timing indicators tracked per onboarding case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    OverallTat,
    XwsActivation,
    SystemActivation,
    XwsToIdv,
    IdvToSystem,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::OverallTat,
        Indicator::XwsActivation,
        Indicator::SystemActivation,
        Indicator::XwsToIdv,
        Indicator::IdvToSystem,
    ];

    /// CSV column the indicator is read from
    pub fn column(self) -> &'static str {
        match self {
            Indicator::OverallTat => "sla_end_to_end_exclude_weekend1",
            Indicator::XwsActivation => "wo_adv_std_exclude_weekend",
            Indicator::SystemActivation => "complaince_activation_exclude_weekend",
            Indicator::XwsToIdv => "xws_activation_to_idv",
            Indicator::IdvToSystem => "xws_idv_to_system_activation",
        }
    }

    /// JSON key used by the dashboard
    pub fn key(self) -> &'static str {
        match self {
            Indicator::OverallTat => "overall_tat",
            Indicator::XwsActivation => "xws_activation",
            Indicator::SystemActivation => "system_activation",
            Indicator::XwsToIdv => "xws_to_idv",
            Indicator::IdvToSystem => "idv_to_system",
        }
    }
}

/// One optional value per indicator. `None` serializes as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndicatorValues {
    pub overall_tat: Option<f64>,
    pub xws_activation: Option<f64>,
    pub system_activation: Option<f64>,
    pub xws_to_idv: Option<f64>,
    pub idv_to_system: Option<f64>,
}

impl IndicatorValues {
    /// Build a value set by evaluating `f` once per indicator
    pub fn from_fn(mut f: impl FnMut(Indicator) -> Option<f64>) -> Self {
        Self {
            overall_tat: f(Indicator::OverallTat),
            xws_activation: f(Indicator::XwsActivation),
            system_activation: f(Indicator::SystemActivation),
            xws_to_idv: f(Indicator::XwsToIdv),
            idv_to_system: f(Indicator::IdvToSystem),
        }
    }

    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::OverallTat => self.overall_tat,
            Indicator::XwsActivation => self.xws_activation,
            Indicator::SystemActivation => self.system_activation,
            Indicator::XwsToIdv => self.xws_to_idv,
            Indicator::IdvToSystem => self.idv_to_system,
        }
    }
}

/// ISO (week, week-year) bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub week: u32,
    pub year: i32,
}

impl Period {
    pub fn new(week: u32, year: i32) -> Self {
        Self { week, year }
    }

    /// ISO week and ISO week-year of `date`
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            week: iso.week(),
            year: iso.year(),
        }
    }
}

/// Onboarding case after type coercion
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingRecord {
    pub supplier_name: String,
    pub onboard_date: Option<NaiveDate>,
    pub week: Option<u32>,
    pub year: Option<i32>,
    pub case_id: Option<String>,
    pub indicators: IndicatorValues,
}

impl OnboardingRecord {
    /// Period bucket, or `None` when the onboarding date did not parse
    pub fn period(&self) -> Option<Period> {
        match (self.week, self.year) {
            (Some(week), Some(year)) => Some(Period { week, year }),
            _ => None,
        }
    }

    pub fn in_period(&self, period: Period) -> bool {
        self.period() == Some(period)
    }
}

impl CsvRecord {
    /// Coerce a raw row. Returns `None` when the supplier name is missing or blank.
    pub fn into_record(self) -> Option<OnboardingRecord> {
        let supplier_name = self.supplier_name.filter(|s| !is_missing(s))?;

        let onboard_date = self
            .onboard_date
            .as_deref()
            .filter(|s| !is_missing(s))
            .and_then(parse_day_first_date);
        let period = onboard_date.map(Period::of);

        let indicators = IndicatorValues {
            overall_tat: coerce_numeric(self.sla_end_to_end_exclude_weekend1.as_deref()),
            xws_activation: coerce_numeric(self.wo_adv_std_exclude_weekend.as_deref()),
            system_activation: coerce_numeric(
                self.complaince_activation_exclude_weekend.as_deref(),
            ),
            xws_to_idv: coerce_numeric(self.xws_activation_to_idv.as_deref()),
            idv_to_system: coerce_numeric(self.xws_idv_to_system_activation.as_deref()),
        };

        let case_id = self
            .cw_num
            .filter(|s| !is_missing(s))
            .map(|s| s.trim().to_string());

        Some(OnboardingRecord {
            supplier_name,
            onboard_date,
            week: period.map(|p| p.week),
            year: period.map(|p| p.year),
            case_id,
            indicators,
        })
    }
}

// Two-digit year formats come first: `%Y` would happily read "24" as year 24.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%Y-%m-%d",
];

const TIME_SUFFIXES: &[&str] = &[" %H:%M", " %H:%M:%S", "T%H:%M:%S"];

// Cell values the CSV exports use for "no value"
const NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Blank cell or one of the null markers
pub fn is_missing(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || NULL_MARKERS.contains(&raw)
}

/// Parse a day-first date, ignoring any time of day.
pub fn parse_day_first_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for date_fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, date_fmt) {
            return Some(date);
        }
        for suffix in TIME_SUFFIXES {
            let fmt = format!("{}{}", date_fmt, suffix);
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, &fmt) {
                return Some(dt.date());
            }
        }
    }

    None
}

/// Parse a numeric cell; blanks, garbage and non-finite values become `None`.
///
/// Infinities are dropped because they have no JSON representation.
pub fn coerce_numeric(raw: Option<&str>) -> Option<f64> {
    raw.filter(|s| !is_missing(s))
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(supplier: Option<&str>, date: &str) -> CsvRecord {
        CsvRecord {
            supplier_name: supplier.map(str::to_string),
            onboard_date: Some(date.to_string()),
            cw_num: Some(" CW-1 ".to_string()),
            sla_end_to_end_exclude_weekend1: Some("5.5".to_string()),
            wo_adv_std_exclude_weekend: Some("n/a".to_string()),
            complaince_activation_exclude_weekend: None,
            xws_activation_to_idv: Some("NaN".to_string()),
            xws_idv_to_system_activation: Some(" 2 ".to_string()),
        }
    }

    #[test]
    fn test_day_first_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_day_first_date("05/03/2024"), Some(expected));
        assert_eq!(parse_day_first_date("05-03-2024"), Some(expected));
        assert_eq!(parse_day_first_date("05.03.2024"), Some(expected));
        assert_eq!(parse_day_first_date("05/03/24"), Some(expected));
        assert_eq!(parse_day_first_date("5 Mar 2024"), Some(expected));
        assert_eq!(parse_day_first_date("5 March 2024"), Some(expected));
        assert_eq!(parse_day_first_date("05/03/2024 14:30"), Some(expected));
        assert_eq!(parse_day_first_date("05/03/2024 14:30:59"), Some(expected));
        assert_eq!(parse_day_first_date("2024-03-05"), Some(expected));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_day_first_date(""), None);
        assert_eq!(parse_day_first_date("not a date"), None);
        assert_eq!(parse_day_first_date("31/02/2024"), None);
        assert_eq!(parse_day_first_date("13/13/2024"), None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(coerce_numeric(Some("3.25")), Some(3.25));
        assert_eq!(coerce_numeric(Some(" 4 ")), Some(4.0));
        assert_eq!(coerce_numeric(Some("")), None);
        assert_eq!(coerce_numeric(Some("abc")), None);
        assert_eq!(coerce_numeric(Some("inf")), None);
        assert_eq!(coerce_numeric(None), None);
    }

    #[test]
    fn test_into_record_derives_iso_period() {
        // 1 Jan 2021 falls in ISO week 53 of 2020
        let record = raw(Some("Acme"), "01/01/2021").into_record().unwrap();
        assert_eq!(record.week, Some(53));
        assert_eq!(record.year, Some(2020));
        assert_eq!(record.period(), Some(Period::new(53, 2020)));
        assert_eq!(record.case_id.as_deref(), Some("CW-1"));
        assert_eq!(record.indicators.overall_tat, Some(5.5));
        assert_eq!(record.indicators.xws_activation, None);
        assert_eq!(record.indicators.system_activation, None);
        assert_eq!(record.indicators.xws_to_idv, None);
        assert_eq!(record.indicators.idv_to_system, Some(2.0));
    }

    #[test]
    fn test_bad_date_has_no_period() {
        let record = raw(Some("Acme"), "someday").into_record().unwrap();
        assert_eq!(record.onboard_date, None);
        assert_eq!(record.period(), None);
        assert!(!record.in_period(Period::new(10, 2024)));
    }

    #[test]
    fn test_null_markers_are_missing() {
        assert!(raw(Some("N/A"), "05/03/2024").into_record().is_none());
        assert!(raw(Some("NULL"), "05/03/2024").into_record().is_none());
        assert!(raw(Some(" nan "), "05/03/2024").into_record().is_none());

        let mut row = raw(Some("Acme"), "N/A");
        row.cw_num = Some("#N/A".to_string());
        let record = row.into_record().unwrap();
        assert_eq!(record.case_id, None);
        assert_eq!(record.onboard_date, None);
        assert_eq!(coerce_numeric(Some("NA")), None);

        assert!(!is_missing("Nantes"));
    }

    #[test]
    fn test_blank_supplier_is_dropped() {
        assert!(raw(None, "05/03/2024").into_record().is_none());
        assert!(raw(Some(""), "05/03/2024").into_record().is_none());
        assert!(raw(Some("   "), "05/03/2024").into_record().is_none());
    }

    #[test]
    fn test_indicator_keys_match_values() {
        let values = IndicatorValues::from_fn(|i| match i {
            Indicator::XwsToIdv => Some(1.0),
            _ => None,
        });
        assert_eq!(values.get(Indicator::XwsToIdv), Some(1.0));
        let json = serde_json::to_value(values).unwrap();
        for indicator in Indicator::ALL {
            assert!(json.get(indicator.key()).is_some());
        }
        assert!(json["overall_tat"].is_null());
    }
}
