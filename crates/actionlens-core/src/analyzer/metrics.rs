use super::efficiency::EfficiencyMetrics;
use super::quality::BuildQuality;
use serde::{Deserialize, Serialize};

/// Estimated minutes per step.
const MINUTES_PER_STEP: f64 = 0.5;
const BASE_EFFICIENCY_SCORE: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceUsage {
    Low,
    Medium,
    High,
}

impl ResourceUsage {
    /// More than 10 steps is high, more than 5 is medium.
    pub fn from_steps(total_steps: usize) -> Self {
        if total_steps > 10 {
            ResourceUsage::High
        } else if total_steps > 5 {
            ResourceUsage::Medium
        } else {
            ResourceUsage::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceUsage::Low => "🟢 Low",
            ResourceUsage::Medium => "🟡 Medium",
            ResourceUsage::High => "🔴 High",
        }
    }
}

/// Performance figures derived from the efficiency and quality analyses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub runtime_minutes: f64,
    pub resource_usage: ResourceUsage,
    pub efficiency_score: u8,
}

pub fn estimate_runtime(efficiency: &EfficiencyMetrics, quality: &BuildQuality) -> f64 {
    let mut minutes = efficiency.total_steps as f64 * MINUTES_PER_STEP;
    if quality.test_coverage {
        minutes += 2.0;
    }
    if quality.linting {
        minutes += 1.0;
    }
    if quality.type_checking {
        minutes += 1.0;
    }
    (minutes * 10.0).round() / 10.0
}

pub fn efficiency_score(efficiency: &EfficiencyMetrics, quality: &BuildQuality) -> u8 {
    let bonuses = [
        efficiency.matrix_builds,
        efficiency.caching_used,
        quality.linting,
        quality.test_coverage,
    ];
    let score = u32::from(BASE_EFFICIENCY_SCORE) + 10 * bonuses.iter().filter(|b| **b).count() as u32;
    score.min(100) as u8
}

pub fn aggregate(efficiency: &EfficiencyMetrics, quality: &BuildQuality) -> PerformanceMetrics {
    PerformanceMetrics {
        runtime_minutes: estimate_runtime(efficiency, quality),
        resource_usage: ResourceUsage::from_steps(efficiency.total_steps),
        efficiency_score: efficiency_score(efficiency, quality),
    }
}
