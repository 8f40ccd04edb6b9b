//! Active/inactive status shared by most catalogue tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::ChoiceField;

/// Record status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Estado {
    /// In use.
    #[default]
    Activo,
    /// Retired but kept for history.
    Inactivo,
}

const OPTIONS: &[(&str, Estado)] = &[("Activo", Estado::Activo), ("Inactivo", Estado::Inactivo)];

/// `estado` input field.
pub const ESTADO: ChoiceField<Estado> = ChoiceField::new("estado", OPTIONS);

impl Estado {
    /// Stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Inactivo => "Inactivo",
        }
    }

    /// Boolean form used by tables with an `activo` column.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Activo)
    }
}

impl fmt::Display for Estado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored status label outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown estado `{0}`")]
pub struct UnknownEstado(pub String);

impl FromStr for Estado {
    type Err = UnknownEstado;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OPTIONS
            .iter()
            .find(|(label, _)| *label == value)
            .map(|(_, estado)| *estado)
            .ok_or_else(|| UnknownEstado(value.to_owned()))
    }
}
