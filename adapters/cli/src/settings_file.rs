use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use raid_spawns_planner::RaidSettings;

/// Reads and validates the settings file at `path`.
pub(crate) fn load_settings(path: impl AsRef<Path>) -> Result<RaidSettings> {
    let settings_path = path.as_ref();
    let contents = fs::read_to_string(settings_path).with_context(|| {
        format!(
            "failed to read settings file at {}",
            settings_path.display()
        )
    })?;
    parse_settings(&contents)
        .with_context(|| format!("invalid settings file {}", settings_path.display()))
}

fn parse_settings(contents: &str) -> Result<RaidSettings> {
    let settings: RaidSettings =
        toml::from_str(contents).context("failed to parse settings toml contents")?;
    if settings.maps.is_empty() {
        bail!("settings declare no maps");
    }

    for (name, map) in &settings.maps {
        let zones = map
            .open_zones
            .iter()
            .chain(&map.pmc_hot_zones)
            .chain(&map.scav_hot_zones)
            .chain(&map.sniper_zones);
        for zone in zones {
            if zone.as_str().contains(',') {
                bail!("zone `{zone}` on map `{name}` must not contain a comma");
            }
        }
    }

    settings.validate().context("settings failed validation")?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_settings_accepts_minimal_documents() {
        let settings = parse_settings(
            r#"
            [maps.factory]
            default_escape_time = 20
            escape_time = 25
            "#,
        )
        .expect("minimal settings");

        assert_eq!(settings.maps["factory"].escape_time, 25);
    }

    #[test]
    fn parse_settings_requires_a_map() {
        let error = parse_settings("[global]\nseed = 3\n").expect_err("no maps");
        assert!(error.to_string().contains("no maps"), "{error}");
    }

    #[test]
    fn parse_settings_rejects_comma_zones() {
        let error = parse_settings(
            r#"
            [maps.woods]
            open_zones = ["Sawmill,Lake"]
            "#,
        )
        .expect_err("comma zone");
        assert!(
            error.to_string().contains("must not contain a comma"),
            "{error}"
        );
    }

    #[test]
    fn parse_settings_surfaces_validation_errors() {
        let error = parse_settings(
            r#"
            [global]
            scav_wave_start_ratio = 1.5

            [maps.lab]
            "#,
        )
        .expect_err("pace out of range");
        let chain = format!("{error:#}");
        assert!(chain.contains("scav_wave_start_ratio"), "{chain}");
    }

    #[test]
    fn parse_settings_reports_toml_errors() {
        let error = parse_settings("[maps.lab\n").expect_err("broken toml");
        assert!(
            error.to_string().contains("failed to parse settings toml"),
            "{error}"
        );
    }
}
