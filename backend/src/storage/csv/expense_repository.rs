use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use csv::{Reader, StringRecord};
use std::fs::File;
use std::io::BufReader;
use tracing::{info, warn};
use uuid::Uuid;

use super::connection::{write_atomically, CsvConnection, EXPENSES_HEADER};
use crate::domain::models::expense::{Expense, ExpenseFilter, ExpensePatch, ExpenseType, NewExpense};
use crate::storage::traits::ExpenseStorage;

/// CSV-based expense repository. All expenses live in a single file.
#[derive(Clone)]
pub struct ExpenseRepository {
    connection: CsvConnection,
}

impl ExpenseRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Expense>> {
        let path = self.connection.expenses_file_path();
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut expenses = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping malformed expense row {} in {}: {}", line + 2, path.display(), e);
                    continue;
                }
            };
            match Self::parse_record(&record) {
                Some(expense) => expenses.push(expense),
                None => warn!("Skipping unreadable expense row {} in {}", line + 2, path.display()),
            }
        }
        Ok(expenses)
    }

    fn write_all(&self, expenses: &[Expense]) -> Result<()> {
        write_atomically(
            &self.connection.expenses_file_path(),
            &EXPENSES_HEADER,
            expenses.iter().map(Self::to_record),
        )
    }

    /// Numeric cells that do not parse read as 0. Rows without a usable id,
    /// type or date are dropped.
    fn parse_record(record: &StringRecord) -> Option<Expense> {
        let field = |i: usize| record.get(i).unwrap_or("").trim();
        let id = field(0);
        if id.is_empty() {
            return None;
        }
        let expense_type: ExpenseType = field(5).parse().ok()?;
        let date = NaiveDate::parse_from_str(field(6), "%Y-%m-%d").ok()?;
        let month_year = Some(field(7).to_string()).filter(|m| !m.is_empty());

        Some(Expense {
            id: id.to_string(),
            user_id: field(1).to_string(),
            category: field(2).to_string(),
            quantity: field(3).parse::<u32>().unwrap_or(0),
            unit_price: field(4).parse::<f64>().unwrap_or(0.0),
            expense_type,
            date,
            month_year,
            paid_amount: field(8).parse::<f64>().unwrap_or(0.0),
            created_at: field(9).to_string(),
        })
    }

    fn to_record(expense: &Expense) -> Vec<String> {
        vec![
            expense.id.clone(),
            expense.user_id.clone(),
            expense.category.clone(),
            expense.quantity.to_string(),
            expense.unit_price.to_string(),
            expense.expense_type.as_str().to_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.month_year.clone().unwrap_or_default(),
            expense.paid_amount.to_string(),
            expense.created_at.clone(),
        ]
    }

    /// Row-level constraints of the expenses table.
    fn check_constraints(record: &NewExpense) -> Result<()> {
        if record.user_id.trim().is_empty() {
            bail!("expense rejected: user_id is required");
        }
        if record.category.trim().is_empty() {
            bail!("expense rejected: category is required");
        }
        if record.quantity < 1 {
            bail!("expense rejected: quantity must be at least 1");
        }
        if !record.unit_price.is_finite() || record.unit_price < 0.0 {
            bail!("expense rejected: unit_price must be 0 or more");
        }
        if !record.paid_amount.is_finite() || record.paid_amount < 0.0 {
            bail!("expense rejected: paid_amount must be 0 or more");
        }
        Ok(())
    }

    fn materialize(record: &NewExpense, created_at: &str) -> Expense {
        Expense {
            id: Uuid::new_v4().to_string(),
            user_id: record.user_id.clone(),
            category: record.category.clone(),
            quantity: record.quantity,
            unit_price: record.unit_price,
            expense_type: record.expense_type,
            date: record.date,
            month_year: record.month_year.clone(),
            paid_amount: record.paid_amount,
            created_at: created_at.to_string(),
        }
    }
}

#[async_trait]
impl ExpenseStorage for ExpenseRepository {
    async fn list_expenses(&self, user_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .read_all()?
            .into_iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .collect();
        // stable: same-date rows keep insertion order
        expenses.sort_by_key(|e| e.date);
        Ok(expenses)
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        Ok(self.read_all()?.into_iter().find(|e| e.id == expense_id))
    }

    async fn insert_expense(&self, record: &NewExpense) -> Result<Expense> {
        let mut inserted = self.insert_expenses(std::slice::from_ref(record)).await?;
        inserted
            .pop()
            .context("insert returned no record")
    }

    async fn insert_expenses(&self, records: &[NewExpense]) -> Result<Vec<Expense>> {
        for record in records {
            Self::check_constraints(record)?;
        }
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let created_at = Utc::now().to_rfc3339();
        let inserted: Vec<Expense> = records
            .iter()
            .map(|r| Self::materialize(r, &created_at))
            .collect();

        let _guard = self.connection.lock();
        let mut expenses = self.read_all()?;
        expenses.extend(inserted.iter().cloned());
        self.write_all(&expenses)?;

        info!("Stored {} expense(s)", inserted.len());
        Ok(inserted)
    }

    async fn update_expense(&self, expense_id: &str, patch: &ExpensePatch) -> Result<Option<Expense>> {
        let _guard = self.connection.lock();
        let mut expenses = self.read_all()?;
        let updated = match expenses.iter_mut().find(|e| e.id == expense_id) {
            Some(expense) => {
                patch.apply_to(expense);
                expense.clone()
            }
            None => return Ok(None),
        };
        self.write_all(&expenses)?;
        Ok(Some(updated))
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        let _guard = self.connection.lock();
        let mut expenses = self.read_all()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense_id);
        if expenses.len() == before {
            return Ok(false);
        }
        self.write_all(&expenses)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::Period;
    use crate::storage::csv::test_utils::TestEnvironment;
    use std::fs;

    fn new_expense(user_id: &str, category: &str, expense_type: ExpenseType, month: u32) -> NewExpense {
        NewExpense {
            user_id: user_id.to_string(),
            category: category.to_string(),
            quantity: 2,
            unit_price: 12.5,
            expense_type,
            date: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            month_year: None,
            paid_amount: 0.0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let env = TestEnvironment::new().unwrap();
        let repo = ExpenseRepository::new(env.connection.clone());

        let stored = repo
            .insert_expense(&new_expense("u1", "Rent", ExpenseType::Fixed, 3))
            .await
            .unwrap();
        assert!(!stored.id.is_empty());
        assert_eq!(stored.amount(), 25.0);

        let loaded = repo.get_expense(&stored.id).await.unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert!(repo.get_expense("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_by_date() {
        let env = TestEnvironment::new().unwrap();
        let repo = ExpenseRepository::new(env.connection.clone());

        repo.insert_expenses(&[
            new_expense("u1", "April food", ExpenseType::Variable, 4),
            new_expense("u1", "March rent", ExpenseType::Fixed, 3),
            new_expense("u1", "March food", ExpenseType::Variable, 3),
            new_expense("u2", "Other user", ExpenseType::Fixed, 3),
        ])
        .await
        .unwrap();

        let all = repo.list_expenses("u1", &ExpenseFilter::default()).await.unwrap();
        let categories: Vec<&str> = all.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["March rent", "March food", "April food"]);

        let march = ExpenseFilter::for_period(Period::new(2025, 3).unwrap());
        assert_eq!(repo.list_expenses("u1", &march).await.unwrap().len(), 2);

        let march_fixed = march.with_type(Some(ExpenseType::Fixed));
        let fixed = repo.list_expenses("u1", &march_fixed).await.unwrap();
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].category, "March rent");
    }

    #[tokio::test]
    async fn test_batch_insert_is_all_or_nothing() {
        let env = TestEnvironment::new().unwrap();
        let repo = ExpenseRepository::new(env.connection.clone());

        let mut bad = new_expense("u1", "Broken", ExpenseType::Fixed, 3);
        bad.quantity = 0;
        let result = repo
            .insert_expenses(&[new_expense("u1", "Fine", ExpenseType::Fixed, 3), bad])
            .await;
        assert!(result.is_err());

        let all = repo.list_expenses("u1", &ExpenseFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let env = TestEnvironment::new().unwrap();
        let repo = ExpenseRepository::new(env.connection.clone());
        let stored = repo
            .insert_expense(&new_expense("u1", "Gym", ExpenseType::Fixed, 3))
            .await
            .unwrap();

        let updated = repo
            .update_expense(&stored.id, &ExpensePatch::paid_amount(25.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.paid_amount, 25.0);
        assert!(updated.is_paid());

        assert!(repo.update_expense("missing", &ExpensePatch::quantity(3)).await.unwrap().is_none());

        assert!(repo.delete_expense(&stored.id).await.unwrap());
        assert!(!repo.delete_expense(&stored.id).await.unwrap());
        assert!(repo.get_expense(&stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unparseable_numbers_read_as_zero() {
        let env = TestEnvironment::new().unwrap();
        let path = env.connection.expenses_file_path();
        fs::write(
            &path,
            "id,user_id,category,quantity,unit_price,type,date,month_year,paid_amount,created_at\n\
             e1,u1,Rent,1,abc,fijo,2025-03-01,,n/a,2025-03-01T00:00:00Z\n\
             e2,u1,Broken,1,10,weekly,2025-03-01,,0,2025-03-01T00:00:00Z\n",
        )
        .unwrap();

        let repo = ExpenseRepository::new(env.connection.clone());
        let expenses = repo.list_expenses("u1", &ExpenseFilter::default()).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].unit_price, 0.0);
        assert_eq!(expenses[0].paid_amount, 0.0);
        assert_eq!(expenses[0].amount(), 0.0);
    }

    #[tokio::test]
    async fn test_rows_with_wrong_field_count_are_skipped() {
        let env = TestEnvironment::new().unwrap();
        let path = env.connection.expenses_file_path();
        fs::write(
            &path,
            "id,user_id,category,quantity,unit_price,type,date,month_year,paid_amount,created_at\n\
             e1,u1,Rent,1,500,fijo,2025-03-01,,0,2025-03-01T00:00:00Z\n\
             e2,u1,Truncated,1\n\
             e3,u1,Food,2,20,variable,2025-03-01,,0,2025-03-01T00:00:00Z,extra\n",
        )
        .unwrap();

        let repo = ExpenseRepository::new(env.connection.clone());
        let expenses = repo.list_expenses("u1", &ExpenseFilter::default()).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, "e1");

        // writes still succeed
        repo.insert_expense(&new_expense("u1", "Gym", ExpenseType::Fixed, 3))
            .await
            .unwrap();
        assert_eq!(repo.list_expenses("u1", &ExpenseFilter::default()).await.unwrap().len(), 2);
    }
}
