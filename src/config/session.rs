use std::collections::BTreeMap;

use burn::prelude::*;

/// Compute-session options the driver applies before building its graph.
#[derive(Config, Debug)]
pub struct SessionConfig {
    /// Skip the availability check for ops that are never executed.
    #[config(default = true)]
    pub place_pruned_graph: bool,
    /// `None` keeps the framework default (allocate all device memory up front).
    pub allow_growth: Option<bool>,
    /// Exported into the driver's environment before the session starts.
    #[config(default = "default_session_env()")]
    pub env: BTreeMap<String, String>,
}

pub fn default_session_env() -> BTreeMap<String, String> {
    // 1 = warnings and errors only
    BTreeMap::from([("TF_CPP_MIN_LOG_LEVEL".to_string(), "1".to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_quiet_the_framework_logs() {
        let session = SessionConfig::new();

        assert!(session.place_pruned_graph);
        assert_eq!(session.allow_growth, None);
        assert_eq!(
            session.env.get("TF_CPP_MIN_LOG_LEVEL").map(String::as_str),
            Some("1")
        );
    }
}
