//! Convective operator configuration.
//!
//! [`ConvectiveConfig`] is validated once when it is built, either
//! directly or from an [`InputOptions`] table. Applying an operator
//! never re-reads options.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use strata_core::ConfigError;
use strata_transfer::ExtrapolationType;

// ── DifferencingForm ───────────────────────────────────────────────

/// Discretization used to turn face values into a cell derivative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DifferencingForm {
    /// `u · grad q` differenced from face values.
    Advective,
    /// `div(u q)` differenced from face fluxes.
    Conservative,
    /// Mean of the advective and conservative forms.
    SkewSymmetric,
}

impl DifferencingForm {
    /// True when face fluxes are computed and synchronized.
    pub fn needs_flux(self) -> bool {
        matches!(self, Self::Conservative | Self::SkewSymmetric)
    }

    /// True when face-interpolated values are synchronized.
    pub fn needs_face_values(self) -> bool {
        matches!(self, Self::Advective | Self::SkewSymmetric)
    }
}

impl FromStr for DifferencingForm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADVECTIVE" => Ok(Self::Advective),
            "CONSERVATIVE" => Ok(Self::Conservative),
            "SKEW_SYMMETRIC" => Ok(Self::SkewSymmetric),
            other => Err(ConfigError::UnsupportedDifferencingForm {
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DifferencingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Advective => "ADVECTIVE",
            Self::Conservative => "CONSERVATIVE",
            Self::SkewSymmetric => "SKEW_SYMMETRIC",
        };
        f.write_str(s)
    }
}

// ── InputOptions ───────────────────────────────────────────────────

/// Flat key/value option table, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputOptions {
    entries: IndexMap<String, String>,
}

impl InputOptions {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// True when `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Parse the value for `key`, or `None` when absent.
    pub fn parse<T: FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.get(key).map(str::parse)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InputOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// ── ConvectiveConfig ───────────────────────────────────────────────

/// Option key selecting the outflow extrapolation type.
pub const OUTFLOW_EXTRAP_KEY: &str = "outflow_bdry_extrap_type";

/// Former name of [`OUTFLOW_EXTRAP_KEY`]; rejected when present.
pub const DEPRECATED_EXTRAP_KEY: &str = "bdry_extrap_type";

/// Settings for a [`ConvectiveOperator`](crate::ConvectiveOperator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvectiveConfig {
    /// How the derivative is differenced.
    pub difference_form: DifferencingForm,
    /// Extrapolation at outflow boundaries. Default: `CONSTANT`.
    pub outflow_bdry_extrap_type: ExtrapolationType,
}

impl Default for ConvectiveConfig {
    fn default() -> Self {
        Self::new(DifferencingForm::Conservative)
    }
}

impl ConvectiveConfig {
    /// `difference_form` with constant outflow extrapolation.
    pub fn new(difference_form: DifferencingForm) -> Self {
        Self {
            difference_form,
            outflow_bdry_extrap_type: ExtrapolationType::Constant,
        }
    }

    /// Read the extrapolation type from `options`.
    ///
    /// Unknown keys are ignored. The deprecated key is an error even
    /// when the current key is also present.
    pub fn from_options(
        difference_form: DifferencingForm,
        options: &InputOptions,
    ) -> Result<Self, ConfigError> {
        if options.contains(DEPRECATED_EXTRAP_KEY) {
            return Err(ConfigError::DeprecatedKey {
                key: DEPRECATED_EXTRAP_KEY.to_string(),
                replacement: OUTFLOW_EXTRAP_KEY.to_string(),
            });
        }
        let mut config = Self::new(difference_form);
        if let Some(kind) = options.parse::<ExtrapolationType>(OUTFLOW_EXTRAP_KEY) {
            config.outflow_bdry_extrap_type = kind?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms_round_trip_through_strings() {
        for form in [
            DifferencingForm::Advective,
            DifferencingForm::Conservative,
            DifferencingForm::SkewSymmetric,
        ] {
            assert_eq!(form.to_string().parse::<DifferencingForm>(), Ok(form));
        }
    }

    #[test]
    fn unknown_form_lists_valid_choices() {
        let err = "UPWIND".parse::<DifferencingForm>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("UPWIND"));
        assert!(msg.contains("ADVECTIVE, CONSERVATIVE, SKEW_SYMMETRIC"));
    }

    #[test]
    fn buffers_synchronized_per_form() {
        assert!(!DifferencingForm::Advective.needs_flux());
        assert!(DifferencingForm::Advective.needs_face_values());
        assert!(DifferencingForm::Conservative.needs_flux());
        assert!(!DifferencingForm::Conservative.needs_face_values());
        assert!(DifferencingForm::SkewSymmetric.needs_flux());
        assert!(DifferencingForm::SkewSymmetric.needs_face_values());
    }

    #[test]
    fn extrapolation_defaults_to_constant() {
        let config =
            ConvectiveConfig::from_options(DifferencingForm::Advective, &InputOptions::new()).unwrap();
        assert_eq!(config.outflow_bdry_extrap_type, ExtrapolationType::Constant);
        assert_eq!(ConvectiveConfig::default().difference_form, DifferencingForm::Conservative);
    }

    #[test]
    fn extrapolation_is_read_from_options() {
        let options = InputOptions::new()
            .with(OUTFLOW_EXTRAP_KEY, "QUADRATIC")
            .with("unrelated", "1");
        let config = ConvectiveConfig::from_options(DifferencingForm::Advective, &options).unwrap();
        assert_eq!(config.outflow_bdry_extrap_type, ExtrapolationType::Quadratic);
    }

    #[test]
    fn deprecated_key_names_its_replacement() {
        let options: InputOptions = [(DEPRECATED_EXTRAP_KEY, "LINEAR")].into_iter().collect();
        let err = ConvectiveConfig::from_options(DifferencingForm::Conservative, &options).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DeprecatedKey {
                key: "bdry_extrap_type".into(),
                replacement: "outflow_bdry_extrap_type".into(),
            }
        );
        assert!(err.to_string().contains("outflow_bdry_extrap_type"));
    }

    #[test]
    fn bad_extrapolation_value_is_rejected() {
        let options = InputOptions::new().with(OUTFLOW_EXTRAP_KEY, "CUBIC");
        assert!(matches!(
            ConvectiveConfig::from_options(DifferencingForm::Conservative, &options),
            Err(ConfigError::UnsupportedExtrapolationType { .. })
        ));
    }
}
