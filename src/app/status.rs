use siteconsent::Config;
use siteconsent::consent::{ConsentController, ConsentPhase};

pub fn render_status(config: &Config, controller: &ConsentController) -> String {
    let phase = match controller.phase() {
        ConsentPhase::Unknown => "unknown",
        ConsentPhase::Pending => "pending (banner shown)",
        ConsentPhase::Decided => "decided",
    };

    let mut lines = vec![
        "◆ siteconsent".to_string(),
        String::new(),
        format!("  version      {}", env!("CARGO_PKG_VERSION")),
        format!("  config       {}", config.config_path.display()),
        format!(
            "  storage      {} (key: {})",
            controller.store().backend(),
            controller.store().key()
        ),
        format!("  phase        {phase}"),
    ];

    match controller.record() {
        Some(record) => {
            let at = chrono::DateTime::from_timestamp_millis(record.timestamp)
                .map_or_else(|| record.timestamp.to_string(), |t| t.to_rfc3339());
            lines.push(format!("  necessary    {}", on_off(record.necessary)));
            lines.push(format!("  performance  {}", on_off(record.performance)));
            lines.push(format!("  functional   {}", on_off(record.functional)));
            lines.push(format!("  targeting    {}", on_off(record.targeting)));
            lines.push(format!("  decided at   {at}"));
        }
        None => lines.push("  record       (none)".to_string()),
    }

    lines.push(format!(
        "  analytics    {} (measurement id: {})",
        if controller.gateway().is_active() {
            "active"
        } else if controller.analytics_permitted() {
            "permitted"
        } else {
            "off"
        },
        controller.measurement_id().unwrap_or("(unset)")
    ));

    lines.join("\n")
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
