use crate::swarm::House;

pub const ANALYSIS_HEADER: &str = "DeepMind Analysis:";

/// Analyst persona prompt for a locked target.
pub fn build_prompt(target: &House) -> String {
    format!(
        "Act as an elite Prime Central London real estate investment analyst. \
        I have an autonomous agent system that just locked onto a target property with a rental yield of {:.1}% \
        and a Composite Risk Index score of {:.0} (out of 50). \
        Write exactly 3 concise, highly professional sentences explaining why this specific asymmetrical \
        risk-reward profile mandates immediate acquisition. \
        Use institutional finance terminology. Do not use the word 'crime', refer to it as 'Composite Risk Index'.",
        target.yield_pct, target.risk
    )
}

/// Deterministic report used whenever the generator fails.
pub fn fallback_report(target: &House) -> String {
    format!(
        "{} This property offers an exceptional {:.1}% yield, comfortably exceeding the institutional baseline. \
        Furthermore, its low Composite Risk Index of {:.0} ensures asset security, ESG compliance, and tenant stability. \
        This asymmetrical risk-reward profile mandates immediate acquisition by the Swarm.",
        ANALYSIS_HEADER, target.yield_pct, target.risk
    )
}
