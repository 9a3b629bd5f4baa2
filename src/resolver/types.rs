use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the two parallel deployment environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Blue,
    Green,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Blue => "blue",
            Environment::Green => "green",
        }
    }

    /// The environment the other one swaps with
    pub fn other(&self) -> Environment {
        match self {
            Environment::Blue => Environment::Green,
            Environment::Green => Environment::Blue,
        }
    }

    /// Classifies a resource name by case-insensitive substring match.
    /// `blue` is checked before `green`.
    pub fn from_name(name: &str) -> Option<Environment> {
        let name = name.to_lowercase();
        if name.contains(Environment::Blue.as_str()) {
            Some(Environment::Blue)
        } else if name.contains(Environment::Green.as_str()) {
            Some(Environment::Green)
        } else {
            None
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(Environment::Blue),
            "green" => Ok(Environment::Green),
            _ => Err(format!("Invalid environment: {}. Valid options: blue, green", s)),
        }
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Environment currently receiving production traffic
    pub environment: Environment,

    /// Environment that is idle and safe to deploy to
    pub idle_environment: Environment,

    pub load_balancer_arn: String,
    pub listener_arn: String,
    pub target_group_arn: String,

    /// Value of the `Name` tag that decided the classification
    pub name_tag: String,
}
