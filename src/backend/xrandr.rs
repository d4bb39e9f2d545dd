//! Xorg backend that drives the `xrandr` command-line utility.
//!
//! Displays are enumerated from the `xrandr --query` listing, where every
//! connected output appears as `<name> connected ...`. Gamma is applied one
//! output at a time with `xrandr --output <name> --gamma R:G:B`.

use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

use crate::backend::DisplayBackend;
use crate::constants::XRANDR_COMMAND;
use crate::error::{FluxError, Result};
use crate::gamma::GammaTriple;

/// Backend that shells out to `xrandr` for every request.
#[derive(Debug, Clone)]
pub struct XrandrBackend {
    command: String,
}

impl XrandrBackend {
    pub fn new() -> Self {
        Self::with_command(XRANDR_COMMAND)
    }

    /// Use a different executable name or path instead of `xrandr`.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for XrandrBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for XrandrBackend {
    fn list_connected_displays(&mut self) -> Result<Vec<String>> {
        let output = Command::new(&self.command)
            .arg("--query")
            .output()
            .map_err(|e| FluxError::Enumeration {
                reason: format!("failed to run {}: {}", self.command, e),
            })?;

        if !output.status.success() {
            return Err(FluxError::Enumeration {
                reason: format!(
                    "{} --query exited with {}: {}",
                    self.command,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let displays = parse_connected_displays(&String::from_utf8_lossy(&output.stdout));
        if displays.is_empty() {
            return Err(FluxError::Enumeration {
                reason: "no connected displays reported".to_string(),
            });
        }

        Ok(displays)
    }

    fn apply_gamma(&mut self, display: &str, gamma: GammaTriple) -> Result<()> {
        let apply_error = |reason: String| FluxError::Apply {
            display: display.to_string(),
            gamma,
            reason,
        };

        let output = Command::new(&self.command)
            .args(gamma_arguments(display, gamma))
            .output()
            .map_err(|e| apply_error(format!("failed to run {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(apply_error(reason));
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "xrandr"
    }
}

fn connected_output_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?m)^(\S+)\s+connected\b").ok())
        .as_ref()
}

/// Extract connected output names from `xrandr --query` output, in listing order.
///
/// Lines for disconnected outputs and mode lines are ignored.
pub fn parse_connected_displays(output: &str) -> Vec<String> {
    let Some(regex) = connected_output_regex() else {
        return Vec::new();
    };

    regex
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Command-line arguments that apply `gamma` to `display`.
pub fn gamma_arguments(display: &str, gamma: GammaTriple) -> Vec<String> {
    vec![
        "--output".to_string(),
        display.to_string(),
        "--gamma".to_string(),
        gamma.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY_OUTPUT: &str = "\
Screen 0: minimum 8 x 8, current 3840 x 1080, maximum 32767 x 32767
eDP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 309mm x 174mm
   1920x1080     60.02*+  59.93
   1680x1050     59.95    59.88
HDMI-1 disconnected (normal left inverted right x axis y axis)
DP-1 disconnected (normal left inverted right x axis y axis)
DP-2 connected 1920x1080+1920+0 (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+  50.00    59.94
";

    #[test]
    fn test_parse_connected_displays() {
        assert_eq!(parse_connected_displays(QUERY_OUTPUT), vec!["eDP-1", "DP-2"]);
    }

    #[test]
    fn test_parse_ignores_disconnected_and_mode_lines() {
        let output = "HDMI-1 disconnected (normal)\n   1920x1080     60.00*+\n";
        assert!(parse_connected_displays(output).is_empty());
        assert!(parse_connected_displays("").is_empty());
    }

    #[test]
    fn test_parse_connected_without_geometry() {
        // Connected but inactive outputs carry no mode geometry
        let output = "VGA-1 connected (normal left inverted right x axis y axis)\n";
        assert_eq!(parse_connected_displays(output), vec!["VGA-1"]);
    }

    #[test]
    fn test_gamma_arguments() {
        let gamma = GammaTriple {
            red: 1.0,
            green: 0.7,
            blue: 0.3,
        };
        assert_eq!(
            gamma_arguments("HDMI-1", gamma),
            vec!["--output", "HDMI-1", "--gamma", "1.0000:0.7000:0.3000"]
        );
    }

    #[test]
    fn test_missing_binary_is_enumeration_error() {
        let mut backend = XrandrBackend::with_command("gammaflux-test-no-such-xrandr");
        assert!(matches!(
            backend.list_connected_displays(),
            Err(FluxError::Enumeration { .. })
        ));
    }

    #[test]
    fn test_missing_binary_is_apply_error() {
        let mut backend = XrandrBackend::with_command("gammaflux-test-no-such-xrandr");
        match backend.apply_gamma("eDP-1", GammaTriple::NEUTRAL) {
            Err(FluxError::Apply { display, gamma, .. }) => {
                assert_eq!(display, "eDP-1");
                assert!(gamma.is_neutral());
            }
            other => panic!("expected apply error, got {:?}", other),
        }
    }
}
