use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("pet_schedule_statds")
        .with_description("Pet schedule app statistics")
        .with_unit("action")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

pub fn incr_schedule_action_statds(action: &str) {
    incr_statds("schedule".to_string(), action.into())
}

pub fn incr_catalog_action_statds(entity: &str, action: &str) {
    incr_statds(entity.to_string(), action.into())
}
