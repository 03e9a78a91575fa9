use crate::plan::Template;
use crate::stats::{split_list, Formats, Metric, Mode};
use crate::store::Color;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path, sync::Arc};

/// The fully validated configuration. Every mode, format, and colour in here has already been
/// checked, so nothing downstream has to deal with a malformed config.
#[derive(Debug)]
pub struct Config {
    /// The email to authenticate with, if not given on the command line.
    pub email: Option<String>,
    /// The address of the note store, if not given on the command line.
    pub store: Option<String>,
    pub formats: Arc<Formats>,
    pub metrics: Vec<Metric>,
    pub templates: Vec<Template>,
}
impl Config {
    /// Reads and validates the JSON config file at the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses and validates a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(json).with_context(|| "failed to parse config json")?;

        let mut formats = Formats::default();
        for (mode, format) in &raw.formats {
            let mode = mode
                .parse::<Mode>()
                .with_context(|| "invalid mode in `formats`")?;
            formats
                .set(mode, format)
                .with_context(|| format!("invalid format for mode `{mode}`"))?;
        }
        let formats = Arc::new(formats);

        let metrics = raw
            .metrics
            .into_iter()
            .map(|(name, metric)| {
                Metric::new(&name, metric.keyword, &metric.modes, Arc::clone(&formats))
                    .with_context(|| format!("invalid metric `{name}`"))
            })
            .collect::<Result<Vec<_>>>()?;

        let templates = raw
            .templates
            .into_iter()
            .map(|(name, template)| {
                let build = || -> Result<Template> {
                    let mode = template.mode.parse::<Mode>()?;
                    let color = template
                        .color
                        .as_deref()
                        .map(str::parse::<Color>)
                        .transpose()?;
                    Ok(Template::new(
                        &name,
                        template.title,
                        mode,
                        &formats,
                        split_list(&template.items),
                        split_list(&template.labels),
                        color,
                    )?)
                };
                build().with_context(|| format!("invalid template `{name}`"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            email: raw.user.and_then(|u| u.email),
            store: raw.store,
            formats,
            metrics,
            templates,
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    user: Option<RawUser>,
    store: Option<String>,
    /// Overrides of the date formats, keyed by mode name.
    #[serde(default)]
    formats: BTreeMap<String, String>,
    #[serde(default)]
    metrics: BTreeMap<String, RawMetric>,
    #[serde(default)]
    templates: BTreeMap<String, RawTemplate>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUser {
    email: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMetric {
    keyword: String,
    /// Comma-separated list of modes.
    modes: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTemplate {
    mode: String,
    title: String,
    /// Comma-separated checklist items.
    #[serde(default)]
    items: String,
    /// Comma-separated label names.
    #[serde(default)]
    labels: String,
    color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;

    const EXAMPLE: &str = r#"{
        "user": { "email": "me@example.com" },
        "store": "notes.local:8080",
        "formats": { "monthly": "%Y-%m" },
        "metrics": {
            "habits": { "keyword": "Habits", "modes": "daily, monthly, total" },
            "chores": { "keyword": "Chores", "modes": "weekly" }
        },
        "templates": {
            "habits": {
                "mode": "daily",
                "title": "Habits {date}",
                "items": "Run, Read ,",
                "labels": "habits",
                "color": "green"
            }
        }
    }"#;

    fn root_cause(err: &anyhow::Error) -> Option<&StatsError> {
        err.chain().find_map(|e| e.downcast_ref::<StatsError>())
    }

    #[test]
    fn loads_example() {
        let config = Config::from_json(EXAMPLE).unwrap();
        assert_eq!(config.email.as_deref(), Some("me@example.com"));
        assert_eq!(config.store.as_deref(), Some("notes.local:8080"));
        assert_eq!(config.formats.get(Mode::Monthly), Some("%Y-%m"));
        assert_eq!(config.formats.get(Mode::Daily), Some("%Y-%m-%d"));

        let names = config.metrics.iter().map(Metric::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["chores", "habits"]);
        assert_eq!(
            config.metrics[1].modes(),
            &[Mode::Daily, Mode::Monthly, Mode::Total]
        );

        let template = &config.templates[0];
        assert_eq!(template.name(), "habits");
        let todos = template.generate(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert_eq!(&*todos[0].items, &["Run".to_string(), "Read".to_string()]);
        assert_eq!(todos[0].color, Some(Color::Green));
    }

    #[test]
    fn metrics_share_the_format_table() {
        let config = Config::from_json(EXAMPLE).unwrap();
        let mut habits = config.metrics[1].clone();
        habits.add_data_point("2024-03", 1, 0).unwrap();
        habits.add_data_point("2024-03-05", 0, 1).unwrap();
        habits.sort();
        let series = habits.series(Mode::Monthly);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].id(), "2024-03");
    }

    #[test]
    fn unknown_metric_mode_fails_fast() {
        let err = Config::from_json(
            r#"{ "metrics": { "habits": { "keyword": "Habits", "modes": "daily, hourly" } } }"#,
        )
        .unwrap_err();
        assert_eq!(
            root_cause(&err),
            Some(&StatsError::UnknownMode("hourly".to_string()))
        );
        assert!(format!("{err:#}").contains("invalid metric `habits`"));
    }

    #[test]
    fn total_template_is_rejected() {
        let err = Config::from_json(
            r#"{ "templates": { "t": { "mode": "total", "title": "T {date}" } } }"#,
        )
        .unwrap_err();
        assert_eq!(
            root_cause(&err),
            Some(&StatsError::UnknownMode("total".to_string()))
        );
    }

    #[test]
    fn bad_formats_are_rejected() {
        let err = Config::from_json(r#"{ "formats": { "daily": "%Y-%Q" } }"#).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(StatsError::InvalidFormat { .. })
        ));

        let err = Config::from_json(r#"{ "formats": { "total": "%Y" } }"#).unwrap_err();
        assert_eq!(
            root_cause(&err),
            Some(&StatsError::UnknownMode("total".to_string()))
        );
    }

    #[test]
    fn bad_colours_are_rejected() {
        let err = Config::from_json(
            r#"{ "templates": { "t": { "mode": "daily", "title": "T {date}", "color": "plaid" } } }"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown note colour"));
    }

    #[test]
    fn empty_config_is_valid() {
        let config = Config::from_json("{}").unwrap();
        assert!(config.email.is_none());
        assert!(config.metrics.is_empty());
        assert!(config.templates.is_empty());
    }
}
