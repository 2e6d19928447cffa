//! Output formatting for CLI display.

use crate::model::WorkoutRecord;

/// The latest-workout panel, one field per line.
pub(super) fn format_summary(record: &WorkoutRecord) -> String {
    let mut lines = vec![
        record.kind.to_string(),
        format!(
            "  When:     {} to {}",
            record.start_date.strftime("%Y-%m-%d %H:%M"),
            record.end_date.strftime("%H:%M UTC"),
        ),
        format!(
            "  Energy:   {:.0} {}",
            record.energy_burned,
            record.energy_burned_unit.as_str()
        ),
        format!("  Distance: {:.2} km", record.distance_km()),
    ];
    if let Some(steps) = record.steps {
        lines.push(format!("  Steps:    {steps}"));
    }
    lines.join("\n") + "\n"
}
