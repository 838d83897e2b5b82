use crate::domain::model::{AlertEmail, TripQuery};

pub const ALERT_SUBJECT: &str = "✅ ¡Plazas Disponibles en tu Tren Renfe!";

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 組出可購票通知信；內容只含行程資料，不含任何憑證
pub fn compose_alert(trip: &TripQuery, booking_url: &str) -> AlertEmail {
    let html_body = format!(
        r#"<html><body>
    <h2>¡Alerta de Disponibilidad de Billetes Renfe!</h2>
    <p>Se han encontrado plazas disponibles para el tren que estabas monitorizando.</p>
    <h3>Detalles del Viaje:</h3>
    <ul>
        <li><b>Origen:</b> {origin}</li>
        <li><b>Destino:</b> {destination}</li>
        <li><b>Fecha:</b> {date}</li>
        <li><b>Hora de Salida:</b> {time}</li>
    </ul>
    <p>¡Date prisa y compra tu billete! <a href="{url}" style="background-color: #007bff; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px;">Ir a Renfe.com</a></p>
</body></html>
"#,
        origin = escape_html(&trip.origin),
        destination = escape_html(&trip.destination),
        date = escape_html(&trip.date),
        time = escape_html(&trip.departure_time),
        url = escape_html(booking_url),
    );

    AlertEmail {
        subject: ALERT_SUBJECT.to_string(),
        html_body,
    }
}
