// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier-facing message and journey-event text. Portuguese, Markdown
//! formatting, kept byte-compatible with the legacy service.

use despacho_core::{Courier, Delivery, DeliveryStatus};

/// Monetary amount in Brazilian format: two decimals, comma separator.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}").replace('.', ",")
}

/// Body of the new-delivery notification sent to the courier.
pub fn notification_text(delivery: &Delivery) -> String {
    let mut text = format!(
        "*Nova {} para {}!*\n\n*Pedido:* {}\n*Endereço:* {}",
        delivery.kind, delivery.client_name, delivery.order_label, delivery.address
    );
    if delivery.amount_to_collect > 0.0 {
        text.push_str(&format!(
            "\n\n*Atenção:* Cobrar R$ {}",
            format_amount(delivery.amount_to_collect)
        ));
    }
    text
}

/// Edited message body after a completed/failed interaction.
pub fn status_update_text(original: &str, status: DeliveryStatus) -> String {
    let emoji = if status == DeliveryStatus::Completed {
        "✅"
    } else {
        "❌"
    };
    format!("{original}\n\n*Status atualizado para: {status} {emoji}*")
}

/// Edited message body after the add-note interaction.
pub fn note_prompt_text(original: &str) -> String {
    format!(
        "{original}\n\n*✅ Entrega Concluída com Observação.*\nPor favor, descreva o ocorrido abaixo e envie."
    )
}

/// Journey event text for delivery creation.
pub fn creation_event_text(delivery: &Delivery, courier: &Courier) -> String {
    format!(
        "Entrega \"{}\" para \"{}\" atribuída a {}.",
        delivery.order_label, delivery.client_name, courier.name
    )
}

/// Journey event text for a manager-initiated status override.
pub fn manager_status_event_text(delivery: &Delivery, status: DeliveryStatus) -> String {
    format!(
        "Gestor alterou status da entrega \"{}\" para {}.",
        delivery.order_label, status
    )
}

/// Journey event text for a courier-driven status transition.
pub fn courier_status_event_text(delivery: &Delivery, status: DeliveryStatus) -> String {
    format!(
        "Entregador atualizou status da entrega \"{}\" para {}.",
        delivery.order_label, status
    )
}
