use super::domain::{
    metric, Effort, Insight, InsightCategory, Priority, ReportKind, ReportMetrics,
    ReportRecommendation,
};
use super::thresholds::ReportThresholds;

#[derive(Debug, Default)]
pub(crate) struct RuleOutput {
    pub insights: Vec<Insight>,
    pub recommendations: Vec<ReportRecommendation>,
}

impl RuleOutput {
    #[allow(clippy::too_many_arguments)]
    fn insight(
        &mut self,
        id: String,
        category: InsightCategory,
        priority: Priority,
        title: &str,
        description: String,
        impact: u8,
        confidence: u8,
    ) {
        self.insights.push(Insight {
            id,
            category,
            priority,
            title: title.to_string(),
            description,
            impact: impact.clamp(1, 10),
            confidence: confidence.min(100),
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn recommend(
        &mut self,
        id: String,
        category: InsightCategory,
        priority: Priority,
        title: &str,
        description: String,
        effort: Effort,
        timeline: &str,
        action_items: &[&str],
    ) {
        self.recommendations.push(ReportRecommendation {
            id,
            category,
            priority,
            title: title.to_string(),
            description,
            effort,
            timeline: timeline.to_string(),
            action_items: action_items.iter().map(|item| item.to_string()).collect(),
        });
    }
}

pub(crate) fn apply_rules(
    kind: ReportKind,
    metrics: &ReportMetrics,
    thresholds: &ReportThresholds,
) -> RuleOutput {
    let mut output = RuleOutput::default();
    match kind {
        ReportKind::TaxSummary => tax_summary(metrics, thresholds, &mut output),
        ReportKind::RevenueTrend => revenue_trend(metrics, thresholds, &mut output),
        ReportKind::ClientRetention => client_retention(metrics, thresholds, &mut output),
        ReportKind::CampaignPerformance => campaign_performance(metrics, thresholds, &mut output),
        ReportKind::Compliance => compliance(metrics, thresholds, &mut output),
    }
    output
}

fn rule_id(kind: ReportKind, rule: &str) -> String {
    format!("{}-{rule}", kind.id())
}

fn tax_summary(metrics: &ReportMetrics, thresholds: &ReportThresholds, output: &mut RuleOutput) {
    let kind = ReportKind::TaxSummary;

    if let Some(rate) = metrics.get(metric::EFFECTIVE_TAX_RATE) {
        if rate > thresholds.high_effective_tax_rate_pct {
            output.insight(
                rule_id(kind, "effective-rate"),
                InsightCategory::Opportunity,
                Priority::High,
                "Effective tax rate above target",
                format!(
                    "Effective tax rate of {rate:.1}% exceeds the {:.1}% planning threshold",
                    thresholds.high_effective_tax_rate_pct
                ),
                8,
                85,
            );
            output.recommend(
                rule_id(kind, "deduction-strategy"),
                InsightCategory::Opportunity,
                Priority::High,
                "Review deduction and deferral strategy",
                "Retirement contributions, HSA funding and timing of deductible expenses can lower the effective rate".to_string(),
                Effort::Medium,
                "2-4 weeks",
                &[
                    "Model additional retirement plan contributions",
                    "Confirm HSA eligibility and remaining contribution room",
                    "Schedule a year-end planning session",
                ],
            );
        }
    }

    let income = metrics.get(metric::TOTAL_INCOME);
    let deductions = metrics.get(metric::DEDUCTIONS);
    if let (Some(income), Some(deductions)) = (income, deductions) {
        if income > 0.0 {
            let ratio = deductions / income;
            if ratio < thresholds.min_deduction_ratio {
                output.insight(
                    rule_id(kind, "deduction-ratio"),
                    InsightCategory::Opportunity,
                    Priority::Medium,
                    "Deductions appear under-utilized",
                    format!(
                        "Deductions cover {:.1}% of income, below the {:.1}% benchmark",
                        ratio * 100.0,
                        thresholds.min_deduction_ratio * 100.0
                    ),
                    6,
                    70,
                );
            }
        }
    }

    if let Some(refund) = metrics.get(metric::REFUND_AMOUNT) {
        if refund > thresholds.large_refund_amount {
            output.insight(
                rule_id(kind, "large-refund"),
                InsightCategory::Efficiency,
                Priority::Medium,
                "Large refund indicates over-withholding",
                format!("A ${refund:.0} refund means cash was withheld that could have been used during the year"),
                5,
                80,
            );
            output.recommend(
                rule_id(kind, "withholding"),
                InsightCategory::Efficiency,
                Priority::Medium,
                "Adjust withholding",
                "Updating Form W-4 keeps more of each paycheck without creating a balance due"
                    .to_string(),
                Effort::Low,
                "1 week",
                &[
                    "Run the withholding estimator with current pay stubs",
                    "Submit an updated W-4 to payroll",
                ],
            );
        }
    }
}

fn revenue_trend(metrics: &ReportMetrics, thresholds: &ReportThresholds, output: &mut RuleOutput) {
    let kind = ReportKind::RevenueTrend;
    let Some(change) = metrics.get(metric::REVENUE_CHANGE_PCT) else {
        return;
    };

    if change < thresholds.revenue_decline_pct {
        output.insight(
            rule_id(kind, "decline"),
            InsightCategory::Risk,
            Priority::Critical,
            "Revenue declining",
            format!("Revenue changed {change:.1}% against the prior period"),
            9,
            90,
        );
        output.recommend(
            rule_id(kind, "re-engagement"),
            InsightCategory::Risk,
            Priority::High,
            "Launch a client re-engagement campaign",
            "Reach lapsed clients before the next filing deadline with a targeted offer"
                .to_string(),
            Effort::Medium,
            "2-3 weeks",
            &[
                "Segment clients who did not return this season",
                "Send a returning-client discount offer",
                "Track reactivations weekly",
            ],
        );
    } else if change > thresholds.revenue_growth_pct {
        output.insight(
            rule_id(kind, "growth"),
            InsightCategory::Trend,
            Priority::Low,
            "Revenue growth accelerating",
            format!("Revenue grew {change:.1}% against the prior period"),
            6,
            85,
        );
        output.recommend(
            rule_id(kind, "capacity"),
            InsightCategory::Trend,
            Priority::Medium,
            "Plan preparer capacity for the next season",
            "Sustained growth will stretch turnaround times during peak weeks".to_string(),
            Effort::High,
            "1-2 months",
            &[
                "Forecast peak-week return volume",
                "Open seasonal preparer requisitions",
            ],
        );
    }
}

fn client_retention(
    metrics: &ReportMetrics,
    thresholds: &ReportThresholds,
    output: &mut RuleOutput,
) {
    let kind = ReportKind::ClientRetention;

    if let Some(retention) = metrics.get(metric::RETENTION_RATE) {
        if retention < thresholds.min_retention_rate_pct {
            output.insight(
                rule_id(kind, "retention"),
                InsightCategory::Risk,
                Priority::High,
                "Client retention below target",
                format!(
                    "{retention:.1}% of clients returned, short of the {:.1}% target",
                    thresholds.min_retention_rate_pct
                ),
                8,
                85,
            );
            output.recommend(
                rule_id(kind, "loyalty-program"),
                InsightCategory::Risk,
                Priority::High,
                "Expand the loyalty program",
                "Tiered loyalty discounts reward clients for filing with the firm again"
                    .to_string(),
                Effort::Medium,
                "3-4 weeks",
                &[
                    "Enroll every returning client at the bronze tier",
                    "Send post-season satisfaction surveys",
                ],
            );
        }
    }

    if let Some(score) = metrics.get(metric::NET_PROMOTER_SCORE) {
        if score >= thresholds.promoter_score {
            output.insight(
                rule_id(kind, "promoters"),
                InsightCategory::Opportunity,
                Priority::Medium,
                "Strong client advocacy",
                format!("Net promoter score of {score:.0} shows clients are likely to refer others"),
                6,
                75,
            );
            output.recommend(
                rule_id(kind, "referrals"),
                InsightCategory::Opportunity,
                Priority::Medium,
                "Start a referral program",
                "Offer a credit for each referred client who files".to_string(),
                Effort::Low,
                "2 weeks",
                &[
                    "Define the referral credit",
                    "Add referral links to client portal emails",
                ],
            );
        }
    }
}

fn campaign_performance(
    metrics: &ReportMetrics,
    thresholds: &ReportThresholds,
    output: &mut RuleOutput,
) {
    let kind = ReportKind::CampaignPerformance;

    if let Some(conversion) = metrics.get(metric::CONVERSION_RATE) {
        if conversion < thresholds.min_conversion_rate_pct {
            output.insight(
                rule_id(kind, "conversion"),
                InsightCategory::Risk,
                Priority::Medium,
                "Campaign conversion is low",
                format!(
                    "{conversion:.2}% of leads converted, below the {:.2}% floor",
                    thresholds.min_conversion_rate_pct
                ),
                6,
                80,
            );
            output.recommend(
                rule_id(kind, "targeting"),
                InsightCategory::Risk,
                Priority::Medium,
                "Refine campaign targeting",
                "Narrow audiences to households and businesses that match recent converters"
                    .to_string(),
                Effort::Medium,
                "2 weeks",
                &[
                    "Compare converted leads against the current audience",
                    "A/B test the landing page offer",
                ],
            );
        }
    }

    if let Some(roi) = metrics.get(metric::RETURN_ON_SPEND_PCT) {
        if roi > thresholds.strong_return_on_spend_pct {
            output.insight(
                rule_id(kind, "return-on-spend"),
                InsightCategory::Opportunity,
                Priority::High,
                "Campaign returns are strong",
                format!("Campaign returned {roi:.0}% on spend"),
                7,
                80,
            );
            output.recommend(
                rule_id(kind, "budget"),
                InsightCategory::Opportunity,
                Priority::Medium,
                "Increase budget on the best channel",
                "Shift spend toward the channel producing the highest return".to_string(),
                Effort::Low,
                "1 week",
                &["Rank channels by return on spend", "Raise the top channel budget by 20%"],
            );
        }
    }
}

fn compliance(metrics: &ReportMetrics, thresholds: &ReportThresholds, output: &mut RuleOutput) {
    let kind = ReportKind::Compliance;

    if let Some(score) = metrics.get(metric::COMPLIANCE_SCORE) {
        if score < thresholds.min_compliance_score {
            let priority = if score < thresholds.critical_compliance_score {
                Priority::Critical
            } else {
                Priority::High
            };
            output.insight(
                rule_id(kind, "score"),
                InsightCategory::Risk,
                priority,
                "Compliance score below target",
                format!(
                    "Compliance score of {score:.0} is under the required {:.0}",
                    thresholds.min_compliance_score
                ),
                if priority == Priority::Critical { 10 } else { 8 },
                90,
            );
        }
    }

    if let Some(findings) = metrics.get(metric::OPEN_FINDINGS) {
        if findings > 0.0 {
            let count = findings.ceil() as u64;
            let priority = if findings >= thresholds.escalated_open_findings {
                Priority::High
            } else {
                Priority::Medium
            };
            output.recommend(
                rule_id(kind, "remediation"),
                InsightCategory::Risk,
                priority,
                "Remediate open compliance findings",
                if count == 1 {
                    "1 finding remains open".to_string()
                } else {
                    format!("{count} findings remain open")
                },
                Effort::Medium,
                "30 days",
                &[
                    "Assign an owner and due date to each open finding",
                    "Attach remediation evidence to the compliance file",
                    "Re-run the compliance review once findings are closed",
                ],
            );
        }
    }
}
