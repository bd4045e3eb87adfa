use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use underwrite_core::{amortization_schedule, analyze_deal, underwrite, DealInput};

use crate::input;

/// Deal parameters. Flag defaults are the mobile form's pre-filled deal.
#[derive(Args)]
pub struct DealArgs {
    /// Path to a JSON or YAML deal file (takes precedence over the flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Acquisition price
    #[arg(long, default_value = "300000", allow_hyphen_values = true)]
    pub purchase_price: Decimal,

    /// Rehab capital, paid in cash and never financed
    #[arg(long, default_value = "30000", allow_hyphen_values = true)]
    pub rehab_cost: Decimal,

    /// Gross scheduled monthly rent
    #[arg(long, default_value = "2500", allow_hyphen_values = true)]
    pub monthly_rent: Decimal,

    /// Annual property taxes
    #[arg(long, default_value = "3600", allow_hyphen_values = true)]
    pub annual_taxes: Decimal,

    /// Annual insurance premium
    #[arg(long, default_value = "1200", allow_hyphen_values = true)]
    pub annual_insurance: Decimal,

    /// Monthly HOA dues
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub monthly_hoa: Decimal,

    /// Vacancy allowance as a fraction of rent (0.05 = 5%)
    #[arg(long, default_value = "0.05", allow_hyphen_values = true)]
    pub vacancy_rate: Decimal,

    /// Maintenance allowance as a fraction of rent
    #[arg(long, default_value = "0.08", allow_hyphen_values = true)]
    pub maintenance_rate: Decimal,

    /// Property management fee as a fraction of rent
    #[arg(long, default_value = "0.08", allow_hyphen_values = true)]
    pub management_rate: Decimal,

    /// Nominal annual interest rate (0.065 = 6.5%)
    #[arg(long, default_value = "0.065", allow_hyphen_values = true)]
    pub interest_rate: Decimal,

    /// Amortization term in years
    #[arg(long, default_value = "30", allow_hyphen_values = true)]
    pub loan_term_years: i32,

    /// Down payment as a fraction of the purchase price
    #[arg(long, default_value = "0.2", allow_hyphen_values = true)]
    pub down_payment_percent: Decimal,

    /// Round money to cents and the return ratio to four places
    #[arg(long)]
    pub round: bool,
}

impl DealArgs {
    fn to_input(&self) -> DealInput {
        DealInput {
            purchase_price: self.purchase_price,
            rehab_cost: self.rehab_cost,
            monthly_rent: self.monthly_rent,
            annual_taxes: self.annual_taxes,
            annual_insurance: self.annual_insurance,
            monthly_hoa: self.monthly_hoa,
            vacancy_rate: self.vacancy_rate,
            maintenance_rate: self.maintenance_rate,
            management_rate: self.management_rate,
            interest_rate: self.interest_rate,
            loan_term_years: self.loan_term_years,
            down_payment_percent: self.down_payment_percent,
        }
    }
}

/// File, then piped stdin, then the field flags.
fn resolve_deal(args: &DealArgs) -> Result<DealInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        tracing::debug!(path = %path, "reading deal from file");
        input::file::read_structured(path)
    } else if let Some(deal) = input::stdin::read_stdin()? {
        tracing::debug!("reading deal from stdin");
        Ok(deal)
    } else {
        tracing::debug!("using deal from command-line flags");
        Ok(args.to_input())
    }
}

pub fn run_deal(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = resolve_deal(&args)?;
    let metrics = underwrite(&deal)?;
    let metrics = if args.round { metrics.rounded() } else { metrics };
    Ok(serde_json::to_value(metrics)?)
}

pub fn run_analyze(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = resolve_deal(&args)?;
    analysis_value(&deal, args.round)
}

fn analysis_value(deal: &DealInput, round: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let mut output = analyze_deal(deal)?;
    if round {
        output.result = output.result.rounded();
    }
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = resolve_deal(&args)?;
    let mut rows = amortization_schedule(&deal)?;
    if args.round {
        for row in &mut rows {
            row.beginning_balance = row.beginning_balance.round_dp(2);
            row.interest_paid = row.interest_paid.round_dp(2);
            row.principal_paid = row.principal_paid.round_dp(2);
            row.ending_balance = row.ending_balance.round_dp(2);
        }
    }
    tracing::debug!(years = rows.len(), "built amortization schedule");
    Ok(serde_json::to_value(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        deal: DealArgs,
    }

    fn defaults() -> DealArgs {
        Harness::try_parse_from(["underwrite"]).unwrap().deal
    }

    #[test]
    fn test_flag_defaults_match_form() {
        let input = defaults().to_input();
        assert_eq!(input.purchase_price, dec!(300000));
        assert_eq!(input.rehab_cost, dec!(30000));
        assert_eq!(input.monthly_rent, dec!(2500));
        assert_eq!(input.vacancy_rate, dec!(0.05));
        assert_eq!(input.interest_rate, dec!(0.065));
        assert_eq!(input.loan_term_years, 30);
        assert_eq!(input.down_payment_percent, dec!(0.2));
    }

    #[test]
    fn test_default_deal_underwrites() {
        let metrics = underwrite(&defaults().to_input()).unwrap().rounded();
        assert_eq!(metrics.loan_amount, dec!(240000));
        assert_eq!(metrics.monthly_noi, dec!(1975));
        assert_eq!(metrics.monthly_principal_and_interest, dec!(1516.96));
    }

    #[test]
    fn test_rounded_analysis_rounds_every_money_field() {
        let value = analysis_value(&defaults().to_input(), true).unwrap();
        let result = &value["result"];
        assert_eq!(result["annual_debt_service"].as_f64(), Some(18203.56));
        assert_eq!(result["monthly_cash_flow"].as_f64(), Some(58.04));
        assert_eq!(result["annual_noi"].as_f64(), Some(23700.0));
        assert_eq!(result["metrics"]["cash_on_cash_roi"].as_f64(), Some(0.0077));
    }
}
