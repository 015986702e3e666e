use crate::types::{ClassificationResult, ClassifiedServer, ServerUsageRecord, ThresholdConfig, Tier};

/// Tier for a single usage ratio. Kill is checked first and both
/// comparisons are inclusive.
pub fn tier_for_ratio(ratio: f64, thresholds: &ThresholdConfig) -> Tier {
    if ratio >= thresholds.kill_percent / 100.0 {
        Tier::Kill
    } else if ratio >= thresholds.notify_percent / 100.0 {
        Tier::Notify
    } else {
        Tier::None
    }
}

pub fn classify(records: &[ServerUsageRecord], thresholds: &ThresholdConfig) -> ClassificationResult {
    let mut result = ClassificationResult::default();
    for record in records {
        let tier = tier_for_ratio(record.ratio, thresholds);
        match tier {
            Tier::Kill => result.kill.push(record.clone()),
            Tier::Notify => result.notify.push(record.clone()),
            Tier::None => result.none.push(record.clone()),
        }
        result.all.push(ClassifiedServer {
            record: record.clone(),
            tier,
        });
    }
    result
}
