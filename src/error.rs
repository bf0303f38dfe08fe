//! Error types shared by the store and the domain services.
//!
//! Domain operations never panic on bad input; they return an [`AppError`] the
//! caller can render. Storage failures are wrapped as [`AppError::Store`].

use std::fmt;

use uuid::Uuid;

/// Failures raised by a [`crate::db::Store`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("error de base de datos: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("no se pudo leer o escribir la colección `{collection}`: {source}")]
    Codec {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("almacenamiento no disponible")]
    Poisoned,
}

/// Validation problems found in one row of a bulk product import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Zero-based position of the row in the submitted batch.
    pub index: usize,
    pub messages: Vec<String>,
}

impl RowError {
    /// Spreadsheet row number: the header is row 1, the first data row is row 2.
    pub fn line(&self) -> usize {
        self.index + 2
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fila {}: {}", self.line(), self.messages.join(", "))
    }
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{}", format_rows(.0))]
    InvalidRows(Vec<RowError>),

    #[error("El email ya está registrado: {0}")]
    DuplicateEmail(String),

    #[error("El pedido no tiene productos")]
    EmptyOrder,

    #[error("No se encontró {} {id}", entity_label(.entity))]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Error al procesar el archivo. Verifique el formato.")]
    Parse,

    #[error("Se requiere rol de administrador")]
    Forbidden,

    #[error("error de configuración: {0}")]
    Config(String),

    #[error("error de credenciales: {0}")]
    Credentials(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        AppError::NotFound { entity, id }
    }
}

fn entity_label(entity: &str) -> &str {
    match entity {
        "product" => "el producto",
        "order" => "el pedido",
        "user" => "el usuario",
        "reminder" => "el recordatorio",
        "notification" => "la notificación",
        other => other,
    }
}

fn format_rows(rows: &[RowError]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub type AppResult<T> = Result<T, AppError>;
