//! Supplier mail payload for a submitted order. Nothing here sends mail.

use chrono::Locale;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::models::{AppSettings, Order};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    /// `mailto:` link that opens the draft in the user's mail client.
    pub fn mailto(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

pub fn compose(order: &Order, settings: &AppSettings, tz: Tz) -> MailDraft {
    MailDraft {
        to: order.supplier_email.clone(),
        subject: format!("Pedido {} - {}", order.id, settings.company_name),
        body: order_text(order, tz),
    }
}

pub fn order_text(order: &Order, tz: Tz) -> String {
    let local = order.created_at.with_timezone(&tz);

    let mut text = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(text, "🛒 PEDIDO #{}", order.id);
    let _ = writeln!(
        text,
        "📅 Fecha: {}",
        local.format_localized("%A, %-d de %B de %Y", Locale::es_AR)
    );
    let _ = writeln!(text, "🕐 Hora: {}", local.format("%H:%M"));
    let _ = writeln!(text, "👤 Solicitado por: {}", order.user_name);
    let _ = writeln!(text);
    let _ = writeln!(text, "📦 PRODUCTOS:");
    for item in &order.items {
        let _ = writeln!(
            text,
            "• {}: {} {} - ${}",
            item.name,
            item.quantity,
            item.unit,
            format_price(item.line_total())
        );
    }
    let _ = writeln!(text);
    let _ = writeln!(text, "💰 TOTAL: ${}", format_price(order.total));
    let _ = write!(text, "📧 Proveedor: {}", order.supplier_email);
    if let Some(notes) = &order.notes {
        let _ = write!(text, "\n📝 Aclaraciones:\n{}", notes);
    }

    text
}

/// es-AR style amount: `.` groups thousands, `,` decimals, at most two decimals.
pub fn format_price(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = (cents / 100).unsigned_abs().to_string();
    let fraction = (cents % 100).unsigned_abs();

    let mut out = String::new();
    if cents < 0 {
        out.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    if fraction != 0 {
        let decimals = format!("{fraction:02}");
        out.push(',');
        out.push_str(decimals.trim_end_matches('0'));
    }

    out
}
