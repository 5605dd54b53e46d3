use anyhow::Context;
use indexmap::IndexMap;
use serde::Serialize;

use crate::data::Data;

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct Summary {
    pub total_spent: f64,
    pub category_breakdown: IndexMap<String, f64>,
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct DailySummary {
    pub daily_expenses: IndexMap<String, f64>,
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct MonthlySummary {
    pub monthly_expenses: IndexMap<String, f64>,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Overbudget,
    Ok,
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct BudgetCheck {
    pub status: BudgetStatus,
    pub total_spent: f64,
    pub limit: f64,
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum AdviceBody {
    Tips(Vec<String>),
    NotEnoughData(String),
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct Advice {
    pub advice: AdviceBody,
}

#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct TransactionCounts {
    pub transaction_counts: IndexMap<String, i64>,
}

pub const NOT_ENOUGH_DATA: &str = "Данных недостаточно для анализа.";

pub async fn summary(data: &Data) -> anyhow::Result<Summary> {
    let category_breakdown = data
        .sum_by_category()
        .await
        .context("error summing categories")?;

    Ok(Summary {
        total_spent: category_breakdown.values().sum(),
        category_breakdown,
    })
}

pub async fn daily(data: &Data) -> anyhow::Result<DailySummary> {
    let daily_expenses = data.sum_by_date().await.context("error summing days")?;

    Ok(DailySummary { daily_expenses })
}

pub async fn monthly(data: &Data) -> anyhow::Result<MonthlySummary> {
    let monthly_expenses = data.sum_by_month().await.context("error summing months")?;

    Ok(MonthlySummary { monthly_expenses })
}

pub async fn check_budget(data: &Data, limit: f64) -> anyhow::Result<BudgetCheck> {
    let total_spent = data.total_expense().await.context("error summing expenses")?;

    Ok(budget_check(total_spent, limit))
}

fn budget_check(total_spent: f64, limit: f64) -> BudgetCheck {
    let status = if total_spent > limit {
        BudgetStatus::Overbudget
    } else {
        BudgetStatus::Ok
    };

    BudgetCheck {
        status,
        total_spent,
        limit,
    }
}

pub async fn advice(data: &Data) -> anyhow::Result<Advice> {
    let ranked = data
        .categories_by_total()
        .await
        .context("error ranking categories")?;

    Ok(Advice {
        advice: advice_for(&ranked),
    })
}

fn advice_for(ranked: &[(String, f64)]) -> AdviceBody {
    let Some((top_category, max_spent)) = ranked.first() else {
        return AdviceBody::NotEnoughData(NOT_ENOUGH_DATA.to_owned());
    };

    let total_spent: f64 = ranked.iter().map(|(_, amount)| amount).sum();

    AdviceBody::Tips(vec![
        format!(
            "Самая большая статья расходов — '{top_category}', всего {max_spent:.2}₸. Подумай, можно ли сократить эти траты."
        ),
        format!(
            "Общий расход за этот период составил {total_spent:.2}₸. Проверь, не выходишь ли за рамки бюджета."
        ),
        format!(
            "Если хочешь сэкономить, попробуй ограничить траты в категории '{top_category}' и распределить деньги более равномерно."
        ),
    ])
}

pub async fn transaction_counts(data: &Data) -> anyhow::Result<TransactionCounts> {
    let transaction_counts = data
        .transaction_counts()
        .await
        .context("error counting transactions")?;

    Ok(TransactionCounts { transaction_counts })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn budget_is_exceeded_only_above_limit() {
        assert_eq!(budget_check(1500.0, 1000.0).status, BudgetStatus::Overbudget);
        assert_eq!(budget_check(1000.0, 1000.0).status, BudgetStatus::Ok);
        assert_eq!(budget_check(0.0, 0.0).status, BudgetStatus::Ok);
    }

    #[test]
    fn budget_check_serializes_lowercase_status() {
        let value = serde_json::to_value(budget_check(1500.0, 1000.0)).unwrap();

        assert_eq!(
            value,
            json!({ "status": "overbudget", "total_spent": 1500.0, "limit": 1000.0 })
        );
    }

    #[test]
    fn advice_without_data_is_a_single_message() {
        let value = serde_json::to_value(Advice {
            advice: advice_for(&[]),
        })
        .unwrap();

        assert_eq!(value, json!({ "advice": NOT_ENOUGH_DATA }));
    }

    #[test]
    fn advice_names_top_category_and_total() {
        let ranked = vec![("Еда".to_owned(), 2000.0), ("Связь".to_owned(), 500.0)];

        let AdviceBody::Tips(tips) = advice_for(&ranked) else {
            panic!("expected tips");
        };

        assert_eq!(tips.len(), 3);
        assert!(tips[0].contains("'Еда'"));
        assert!(tips[0].contains("2000.00₸"));
        assert!(tips[1].contains("2500.00₸"));
        assert!(tips[2].contains("'Еда'"));
    }

    #[tokio::test]
    async fn summary_is_stable_between_calls() {
        let data = Data::in_memory().await;
        data.record_expense(&crate::data::NewExpense {
            date: "2024-01-05".to_owned(),
            booked_on: None,
            category: "Еда".to_owned(),
            amount: 1500.0,
            details: "Magnum".to_owned(),
        })
        .await
        .unwrap();

        let first = summary(&data).await.unwrap();
        let second = summary(&data).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.total_spent, 1500.0);
    }
}
