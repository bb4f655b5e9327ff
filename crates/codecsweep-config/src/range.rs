//! Range syntax and parameter space construction
//!
//! Numeric axes accept half-open `a..b`, inclusive `a..=b`, a single value
//! `a`, or a comma-separated mix of those (`1,3,5..8`). Enum axes accept a
//! comma-separated list of labels, matched case-insensitively.

use crate::{ConfigError, ConfigResult, RangeDefaults};
use codecsweep_types::{
    BrotliMode, CodecFamily, Error as SweepError, Lz4BlockSize, ParameterSet, ParameterSpace,
};
use std::str::FromStr;

fn parse_bound(axis: &str, text: &str) -> ConfigResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::invalid_value(axis, format!("'{}' is not an integer", text.trim())))
}

/// Most values a single axis expression may expand to
pub const MAX_AXIS_LEN: usize = 1 << 16;

/// Reject an expansion that would push the axis past [`MAX_AXIS_LEN`]
fn check_axis_len(axis: &str, current: usize, start: i64, end_inclusive: i64) -> ConfigResult<()> {
    let span = i128::from(end_inclusive) - i128::from(start) + 1;
    let total = span + current as i128;
    if total > MAX_AXIS_LEN as i128 {
        return Err(ConfigError::invalid_value(
            axis,
            format!("range expands to {} values, the limit is {}", total, MAX_AXIS_LEN),
        ));
    }
    Ok(())
}

/// Parse an integer range expression into its values, in order
pub fn parse_int_range<T>(axis: &str, spec: &str) -> ConfigResult<Vec<T>>
where
    T: TryFrom<i64>,
{
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(ConfigError::invalid_value(axis, "empty range"));
    }

    let mut raw = Vec::new();
    for item in spec.split(',') {
        let item = item.trim();
        if let Some((start, end)) = item.split_once("..=") {
            let (start, end) = (parse_bound(axis, start)?, parse_bound(axis, end)?);
            if start > end {
                return Err(ConfigError::invalid_value(
                    axis,
                    format!("reversed range {}..={}", start, end),
                ));
            }
            check_axis_len(axis, raw.len(), start, end)?;
            raw.extend(start..=end);
        } else if let Some((start, end)) = item.split_once("..") {
            let (start, end) = (parse_bound(axis, start)?, parse_bound(axis, end)?);
            if start >= end {
                return Err(ConfigError::invalid_value(
                    axis,
                    format!("empty or reversed range {}..{}", start, end),
                ));
            }
            check_axis_len(axis, raw.len(), start, end - 1)?;
            raw.extend(start..end);
        } else {
            let value = parse_bound(axis, item)?;
            check_axis_len(axis, raw.len(), value, value)?;
            raw.push(value);
        }
    }

    raw.into_iter()
        .map(|value| {
            T::try_from(value)
                .map_err(|_| ConfigError::invalid_value(axis, format!("{} is out of range", value)))
        })
        .collect()
}

/// Parse a comma-separated list of enum labels
pub fn parse_labels<T>(axis: &str, spec: &str) -> ConfigResult<Vec<T>>
where
    T: FromStr<Err = SweepError>,
{
    let labels: Vec<_> = spec
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect();
    if labels.is_empty() {
        return Err(ConfigError::invalid_value(axis, "no labels given"));
    }
    labels
        .into_iter()
        .map(|label| {
            label
                .parse::<T>()
                .map_err(|e| ConfigError::invalid_value(axis, e.to_string()))
        })
        .collect()
}

/// Per-axis range expressions given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeOverrides {
    /// Brotli quality
    pub quality: Option<String>,
    /// Brotli mode labels
    pub mode: Option<String>,
    /// Brotli window bits
    pub window_bits: Option<String>,
    /// Gzip, LZ4 or Zstd level
    pub level: Option<String>,
    /// LZ4 block size labels
    pub block_size: Option<String>,
}

impl RangeOverrides {
    fn given(&self) -> Vec<&'static str> {
        [
            ("quality", &self.quality),
            ("mode", &self.mode),
            ("window_bits", &self.window_bits),
            ("level", &self.level),
            ("block_size", &self.block_size),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_some())
        .map(|(name, _)| name)
        .collect()
    }

    fn check_applicable(&self, family: CodecFamily) -> ConfigResult<()> {
        let axes = family.axis_names();
        match self.given().into_iter().find(|name| !axes.contains(name)) {
            Some(name) => Err(ConfigError::invalid_value(
                name,
                format!("does not apply to {}", family),
            )),
            None => Ok(()),
        }
    }
}

fn pick<'a>(override_value: &'a Option<String>, default: &'a str) -> &'a str {
    override_value.as_deref().unwrap_or(default)
}

/// Build the sweep space for a family from defaults and overrides
///
/// An override for an axis the family does not have is an error.
pub fn build_space(
    family: CodecFamily,
    defaults: &RangeDefaults,
    overrides: &RangeOverrides,
) -> ConfigResult<ParameterSpace> {
    overrides.check_applicable(family)?;

    let space = match family {
        CodecFamily::Brotli => {
            let ranges = &defaults.brotli;
            ParameterSpace::brotli(
                parse_int_range("quality", pick(&overrides.quality, &ranges.quality))?,
                parse_labels::<BrotliMode>("mode", pick(&overrides.mode, &ranges.mode))?,
                parse_int_range(
                    "window_bits",
                    pick(&overrides.window_bits, &ranges.window_bits),
                )?,
            )
        }
        CodecFamily::Gzip => ParameterSpace::gzip(parse_int_range(
            "level",
            pick(&overrides.level, &defaults.gzip.level),
        )?),
        CodecFamily::Lz4 => ParameterSpace::lz4(
            parse_int_range("level", pick(&overrides.level, &defaults.lz4.level))?,
            parse_labels::<Lz4BlockSize>(
                "block_size",
                pick(&overrides.block_size, &defaults.lz4.block_size),
            )?,
        ),
        CodecFamily::Zstd => ParameterSpace::zstd(parse_int_range(
            "level",
            pick(&overrides.level, &defaults.zstd.level),
        )?),
        CodecFamily::Snappy => Ok(ParameterSpace::snappy()),
    };

    space.map_err(|e| ConfigError::validation(e.to_string()))
}

fn single<T>(axis: &str, values: Vec<T>) -> ConfigResult<T> {
    let count = values.len();
    let mut values = values.into_iter();
    match (values.next(), count) {
        (Some(value), 1) => Ok(value),
        _ => Err(ConfigError::invalid_value(
            axis,
            format!("expected a single value, got {}", count),
        )),
    }
}

/// Build one parameter set from single-value overrides
///
/// Axes without an override take the family's default parameters.
pub fn build_params(family: CodecFamily, overrides: &RangeOverrides) -> ConfigResult<ParameterSet> {
    overrides.check_applicable(family)?;

    let params = match ParameterSet::default_for(family) {
        ParameterSet::Brotli {
            quality,
            mode,
            window_bits,
        } => ParameterSet::Brotli {
            quality: match &overrides.quality {
                Some(spec) => single("quality", parse_int_range("quality", spec)?)?,
                None => quality,
            },
            mode: match &overrides.mode {
                Some(spec) => single("mode", parse_labels("mode", spec)?)?,
                None => mode,
            },
            window_bits: match &overrides.window_bits {
                Some(spec) => single("window_bits", parse_int_range("window_bits", spec)?)?,
                None => window_bits,
            },
        },
        ParameterSet::Gzip { level } => ParameterSet::Gzip {
            level: match &overrides.level {
                Some(spec) => single("level", parse_int_range("level", spec)?)?,
                None => level,
            },
        },
        ParameterSet::Lz4 { level, block_size } => ParameterSet::Lz4 {
            level: match &overrides.level {
                Some(spec) => single("level", parse_int_range("level", spec)?)?,
                None => level,
            },
            block_size: match &overrides.block_size {
                Some(spec) => single("block_size", parse_labels("block_size", spec)?)?,
                None => block_size,
            },
        },
        ParameterSet::Zstd { level } => ParameterSet::Zstd {
            level: match &overrides.level {
                Some(spec) => single("level", parse_int_range("level", spec)?)?,
                None => level,
            },
        },
        ParameterSet::Snappy => ParameterSet::Snappy,
    };
    Ok(params)
}
