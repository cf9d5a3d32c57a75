use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// The fixed palette a task can be tagged with. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskColor {
    #[default]
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    PinkRed,
    Beige,
}

impl TaskColor {
    /// Palette in display order; the first entry is the form default.
    pub const ALL: [TaskColor; 9] = [
        TaskColor::Red,
        TaskColor::Orange,
        TaskColor::Yellow,
        TaskColor::Green,
        TaskColor::Blue,
        TaskColor::Purple,
        TaskColor::Pink,
        TaskColor::PinkRed,
        TaskColor::Beige,
    ];

    /// Token used on the wire and on the command line.
    pub fn token(self) -> &'static str {
        match self {
            TaskColor::Red => "red",
            TaskColor::Orange => "orange",
            TaskColor::Yellow => "yellow",
            TaskColor::Green => "green",
            TaskColor::Blue => "blue",
            TaskColor::Purple => "purple",
            TaskColor::Pink => "pink",
            TaskColor::PinkRed => "pink-red",
            TaskColor::Beige => "beige",
        }
    }

    /// Hex value of the swatch.
    pub fn hex(self) -> &'static str {
        match self {
            TaskColor::Red => "#EF4444",
            TaskColor::Orange => "#F97316",
            TaskColor::Yellow => "#EAB308",
            TaskColor::Green => "#22C55E",
            TaskColor::Blue => "#3B82F6",
            TaskColor::Purple => "#A855F7",
            TaskColor::Pink => "#EC4899",
            TaskColor::PinkRed => "#F43F5E",
            TaskColor::Beige => "#F59E0B",
        }
    }

    pub fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for TaskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TaskColor {
    type Err = DomainError;

    /// Accepts the plain tokens as well as the `bg-<shade>-500` utility
    /// classes older servers store.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let color = match normalized.as_str() {
            "red" | "bg-red-500" => TaskColor::Red,
            "orange" | "bg-orange-500" => TaskColor::Orange,
            "yellow" | "bg-yellow-500" => TaskColor::Yellow,
            "green" | "bg-green-500" => TaskColor::Green,
            "blue" | "bg-blue-500" => TaskColor::Blue,
            "purple" | "bg-purple-500" => TaskColor::Purple,
            "pink" | "bg-pink-500" => TaskColor::Pink,
            "pink-red" | "rose" | "bg-rose-500" => TaskColor::PinkRed,
            "beige" | "amber" | "bg-amber-500" => TaskColor::Beige,
            _ => return Err(DomainError::UnknownColor(s.to_string())),
        };
        Ok(color)
    }
}
