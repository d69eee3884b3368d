//! Supports reading the simulator configuration from YAML file (optional)

use std::path::Path;

use regex::Regex;
use tracing::debug;
use yaml_rust2::{Yaml, YamlLoader};

use crate::kinematic_traits::{Elbow, Joints2R, Joints3R, JointsPolar};
use crate::parameter_error::ParameterError;
use crate::parameters::arm_kinematics::{LinkLengths, SimulatorConfig};

/// Matches unit expressions like `mm(350)`, `rad(1.2)` or `deg(-90.0)`.
const UNIT_EXPRESSION: &str =
    r"^\s*([a-z]+)\s*\(\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*\)\s*$";

const TOP_LEVEL_KEYS: [&str; 4] = ["arm_3r", "polar", "arm_2r", "animation_duration_ms"];

#[derive(Clone, Copy)]
enum Quantity {
    /// Returned in meters. Plain numbers are meters.
    Length,
    /// Returned in degrees. Plain numbers are degrees.
    Angle,
    /// Plain numbers only.
    Scalar,
}

impl SimulatorConfig {
    /// Read the simulator configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// arm_3r:
    ///   l1: mm(350)
    ///   l2: 0.4
    ///   preferred_elbow: 1
    ///   joints: [10, 30, 15]
    /// polar:
    ///   rho_min: mm(50)
    ///   rho_max: mm(900)
    ///   theta_from: -180
    ///   joints: [10, 25, mm(450)]
    /// arm_2r:
    ///   l1: mm(250)
    ///   l2: mm(180)
    ///   preferred_elbow: -1
    ///   joints: [20, rad(0.5)]
    /// animation_duration_ms: 800
    /// ```
    /// Every key is optional; missing values keep the defaults of [`SimulatorConfig::default`].
    /// Plain lengths are meters and plain angles are degrees. Lengths can also be written as
    /// `mm(..)`, `cm(..)` or `m(..)`, angles as `deg(..)` or `rad(..)`.
    /// The result is validated before it is returned.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Same as [`SimulatorConfig::from_yaml_file`], from the YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ParameterError::ParseError(format!("{}", e)))?;
        let mut config = SimulatorConfig::default();
        let doc = match docs.first() {
            Some(doc) if !doc.is_null() => doc,
            _ => return Ok(config), // Empty file, all defaults
        };

        let Some(hash) = doc.as_hash() else {
            return Err(ParameterError::ParseError("top level must be a mapping".into()));
        };
        for (key, value) in hash {
            match key.as_str() {
                Some("animation_duration_ms") => {}
                Some(name) if TOP_LEVEL_KEYS.contains(&name) => {
                    if !(value.is_null() || value.as_hash().is_some()) {
                        return Err(ParameterError::ParseError(
                            format!("'{}' must be a mapping", name)));
                    }
                }
                _ => return Err(ParameterError::ParseError(format!("unknown key {:?}", key))),
            }
        }

        let reader = ValueReader::new()?;

        let arm = &doc["arm_3r"];
        config.arm_3r = reader.lengths(arm, "arm_3r", config.arm_3r)?;
        if let Some(elbow) = reader.elbow(&arm["preferred_elbow"], "arm_3r.preferred_elbow")? {
            config.elbow_3r = elbow;
        }
        if let Some([q1, q2, q3]) = reader.joints(&arm["joints"], "arm_3r.joints",
                                                  [Quantity::Angle; 3])? {
            config.joints_3r = Joints3R::from_degrees(q1, q2, q3);
        }

        let polar = &doc["polar"];
        if let Some(v) = reader.number(&polar["rho_min"], Quantity::Length, "polar.rho_min")? {
            config.polar.rho_min = v;
        }
        if let Some(v) = reader.number(&polar["rho_max"], Quantity::Length, "polar.rho_max")? {
            config.polar.rho_max = v;
        }
        if let Some(v) = reader.number(&polar["theta_from"], Quantity::Angle, "polar.theta_from")? {
            config.polar.theta_from = v;
        }
        if let Some([theta, phi, rho]) = reader.joints(&polar["joints"], "polar.joints",
                                                       [Quantity::Angle, Quantity::Angle, Quantity::Length])? {
            config.joints_polar = JointsPolar::from_degrees(theta, phi, rho);
        }

        let arm = &doc["arm_2r"];
        config.arm_2r = reader.lengths(arm, "arm_2r", config.arm_2r)?;
        if let Some(elbow) = reader.elbow(&arm["preferred_elbow"], "arm_2r.preferred_elbow")? {
            config.elbow_2r = elbow;
        }
        if let Some([q1, q2]) = reader.joints(&arm["joints"], "arm_2r.joints",
                                              [Quantity::Angle; 2])? {
            config.joints_2r = Joints2R::from_degrees(q1, q2);
        }

        if let Some(v) = reader.number(&doc["animation_duration_ms"], Quantity::Scalar,
                                       "animation_duration_ms")? {
            config.animation_duration_ms = v;
        }

        config.validate()?;
        debug!("loaded simulator configuration: {:?}", config);
        Ok(config)
    }
}

struct ValueReader {
    unit_expression: Regex,
}

impl ValueReader {
    fn new() -> Result<Self, ParameterError> {
        let unit_expression = Regex::new(UNIT_EXPRESSION)
            .map_err(|e| ParameterError::ParseError(format!("{}", e)))?;
        Ok(ValueReader { unit_expression })
    }

    /// Missing or null values are `None`.
    fn number(&self, value: &Yaml, quantity: Quantity, label: &str)
              -> Result<Option<f64>, ParameterError> {
        match value {
            Yaml::BadValue | Yaml::Null => Ok(None),
            Yaml::Integer(i) => Ok(Some(*i as f64)),
            Yaml::Real(text) => value.as_f64().map(Some).ok_or_else(|| {
                ParameterError::ParseError(format!("'{}' is not a number: {}", label, text))
            }),
            Yaml::String(text) => self.expression(text, quantity, label).map(Some),
            _ => Err(ParameterError::ParseError(format!("'{}' must be a number", label))),
        }
    }

    fn expression(&self, text: &str, quantity: Quantity, label: &str)
                  -> Result<f64, ParameterError> {
        let captures = self.unit_expression.captures(text).ok_or_else(|| {
            ParameterError::ParseError(format!("'{}' cannot be parsed: {:?}", label, text))
        })?;
        let value: f64 = captures[2].parse().map_err(|_| {
            ParameterError::ParseError(format!("'{}' cannot be parsed: {:?}", label, text))
        })?;
        let unit = &captures[1];
        match (quantity, unit) {
            (Quantity::Length, "mm") => Ok(value / 1000.0),
            (Quantity::Length, "cm") => Ok(value / 100.0),
            (Quantity::Length, "m") => Ok(value),
            (Quantity::Angle, "deg") => Ok(value),
            (Quantity::Angle, "rad") => Ok(value.to_degrees()),
            _ => Err(ParameterError::WrongUnit(format!("{}({}) for '{}'", unit, value, label))),
        }
    }

    fn lengths(&self, arm: &Yaml, label: &str, defaults: LinkLengths)
               -> Result<LinkLengths, ParameterError> {
        let l1 = self.number(&arm["l1"], Quantity::Length, &format!("{}.l1", label))?;
        let l2 = self.number(&arm["l2"], Quantity::Length, &format!("{}.l2", label))?;
        Ok(LinkLengths {
            l1: l1.unwrap_or(defaults.l1),
            l2: l2.unwrap_or(defaults.l2),
        })
    }

    fn elbow(&self, value: &Yaml, label: &str) -> Result<Option<Elbow>, ParameterError> {
        match self.number(value, Quantity::Scalar, label)? {
            None => Ok(None),
            Some(sign) if sign == 1.0 => Ok(Some(Elbow::Positive)),
            Some(sign) if sign == -1.0 => Ok(Some(Elbow::Negative)),
            Some(sign) => Err(ParameterError::InvalidValue(format!(
                "'{}' must be 1 or -1 (got {})", label, sign
            ))),
        }
    }

    fn joints<const N: usize>(&self, value: &Yaml, label: &str, quantities: [Quantity; N])
                              -> Result<Option<[f64; N]>, ParameterError> {
        if value.is_badvalue() || value.is_null() {
            return Ok(None);
        }
        let items = value.as_vec().ok_or_else(|| {
            ParameterError::ParseError(format!("'{}' must be a list", label))
        })?;
        if items.len() != N {
            return Err(ParameterError::InvalidValue(format!(
                "'{}' must have {} values (got {})", label, N, items.len()
            )));
        }
        let mut out = [0.0; N];
        for (i, item) in items.iter().enumerate() {
            let item_label = format!("{}[{}]", label, i);
            out[i] = self.number(item, quantities[i], &item_label)?.ok_or_else(|| {
                ParameterError::ParseError(format!("'{}' is missing", item_label))
            })?;
        }
        Ok(Some(out))
    }
}
