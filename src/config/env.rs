use std::num::IntErrorKind;

use crate::config::constants::{ENV_GPUS, ENV_KIMG};
use crate::error::ConfigError;

/// Benchmark parameters supplied through the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchEnv {
    /// Raw `BMARK_GPUS`. `None` when the integer does not fit in an `i64`;
    /// like any other count without a preset it selects the 8-GPU one.
    pub gpus: Option<i64>,
    /// `BMARK_KIMG`, the total training length.
    pub total_kimg: u64,
}

impl BenchEnv {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| match std::env::var(name) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gpus = read_gpus(&lookup)?;
        let total_kimg = read_kimg(&lookup)?;

        Ok(Self { gpus, total_kimg })
    }
}

fn read_var<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or(ConfigError::MissingEnv { name })
}

fn read_gpus<F>(lookup: &F) -> Result<Option<i64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = read_var(lookup, ENV_GPUS)?;
    match value.trim().parse::<i64>() {
        Ok(gpus) => Ok(Some(gpus)),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(None)
        }
        Err(source) => Err(ConfigError::InvalidEnv {
            name: ENV_GPUS,
            value,
            source,
        }),
    }
}

fn read_kimg<F>(lookup: &F) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = read_var(lookup, ENV_KIMG)?;
    let text = value.trim();
    match text.parse::<u64>() {
        Ok(kimg) => Ok(kimg),
        Err(source) => match text.strip_prefix('-') {
            Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                if digits.bytes().all(|b| b == b'0') {
                    Ok(0)
                } else {
                    Err(ConfigError::NegativeKimg {
                        value: text.to_string(),
                    })
                }
            }
            _ => Err(ConfigError::InvalidEnv {
                name: ENV_KIMG,
                value,
                source,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn reads_both_variables() {
        let env = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "4"), ("BMARK_KIMG", "12000")])).unwrap();
        assert_eq!(env, BenchEnv { gpus: Some(4), total_kimg: 12000 });
    }

    #[test]
    fn tolerates_whitespace_and_sign() {
        let env = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", " +2\n"), ("BMARK_KIMG", " 7 ")])).unwrap();
        assert_eq!(env, BenchEnv { gpus: Some(2), total_kimg: 7 });
    }

    #[test]
    fn missing_variable_is_an_error() {
        let err = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "1")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv { name: "BMARK_KIMG" }));

        let err = BenchEnv::from_lookup(lookup(&[("BMARK_KIMG", "1")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv { name: "BMARK_GPUS" }));
    }

    #[test]
    fn non_integer_is_an_error() {
        for bad in ["", "four", "2.5", "1e3"] {
            let err = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", bad), ("BMARK_KIMG", "10")])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnv { name: "BMARK_GPUS", .. }), "{bad:?}");

            let err = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "1"), ("BMARK_KIMG", bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnv { name: "BMARK_KIMG", .. }), "{bad:?}");
        }
        for bad in ["1.5", "ten", "-", "--3", "-1.5"] {
            let err = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "1"), ("BMARK_KIMG", bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnv { name: "BMARK_KIMG", .. }), "{bad:?}");
        }
    }

    #[test]
    fn kimg_covers_the_full_unsigned_range() {
        let env = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "8"), ("BMARK_KIMG", "18446744073709551615")])).unwrap();
        assert_eq!(env.total_kimg, u64::MAX);

        let env = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "8"), ("BMARK_KIMG", "-0")])).unwrap();
        assert_eq!(env.total_kimg, 0);

        let err = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "8"), ("BMARK_KIMG", "18446744073709551616")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "BMARK_KIMG", .. }));
    }

    #[test]
    fn oversized_gpu_count_has_no_exact_value() {
        for huge in ["99999999999999999999", "-99999999999999999999"] {
            let env = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", huge), ("BMARK_KIMG", "10")])).unwrap();
            assert_eq!(env.gpus, None, "{huge:?}");
        }
    }

    #[test]
    fn negative_kimg_is_an_error() {
        let err = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "1"), ("BMARK_KIMG", "-5")])).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeKimg { ref value } if value == "-5"));

        let err = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "1"), ("BMARK_KIMG", "-99999999999999999999")])).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeKimg { .. }));
    }

    #[test]
    fn negative_gpu_count_is_accepted() {
        let env = BenchEnv::from_lookup(lookup(&[("BMARK_GPUS", "-1"), ("BMARK_KIMG", "0")])).unwrap();
        assert_eq!(env.gpus, Some(-1));
    }
}
