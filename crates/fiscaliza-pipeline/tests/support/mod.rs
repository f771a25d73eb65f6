//! Scripted legislature source shared by the pipeline integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use fiscaliza_core::{Politician, Proposition, RawExpense, RawVote, Role};
use fiscaliza_pipeline::LegislatureSource;
use fiscaliza_sources::SourceError;
use rust_decimal::Decimal;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn politician(id: i64, name: &str, state: &str, role: Role) -> Politician {
    Politician {
        id,
        name: name.to_string(),
        party: "PT".to_string(),
        state: state.to_string(),
        role,
        photo: None,
        email: None,
    }
}

pub fn expense(politician_id: i64, year: i32, month: u32, value: i64) -> RawExpense {
    RawExpense {
        politician_id,
        year,
        month: i32::try_from(month).expect("month fits"),
        category: "TELEFONIA".to_string(),
        description: None,
        value: Decimal::from(value),
        date: day(year, month, 1),
    }
}

pub fn vote(politician_id: i64, label: &str, date: NaiveDate) -> RawVote {
    RawVote {
        politician_id,
        proposition_id: "2270800".to_string(),
        proposition_title: "Votação".to_string(),
        vote: label.to_string(),
        date,
    }
}

fn unavailable(what: &str) -> SourceError {
    SourceError::Status {
        url: format!("http://scripted.test/{what}"),
        status: 503,
    }
}

/// A source that answers from fixed data and fails where told to.
#[derive(Default)]
pub struct ScriptedSource {
    pub deputies: Vec<Politician>,
    pub senators: Vec<Politician>,
    pub expenses: HashMap<i64, Vec<RawExpense>>,
    pub votes: HashMap<i64, Vec<RawVote>>,
    pub propositions: Vec<Proposition>,
    pub failing_expenses: HashSet<i64>,
    pub failing_votes: HashSet<i64>,
    pub deputies_down: bool,
    pub senators_down: bool,
    pub propositions_down: bool,
}

impl ScriptedSource {
    /// `n` deputies in SP, each with one expense of 1 000 in March and one
    /// "Sim" vote dated `vote_date`.
    pub fn with_deputies(n: i64, year: i32, vote_date: NaiveDate) -> Self {
        let mut source = Self::default();
        for id in 1..=n {
            source
                .deputies
                .push(politician(id, &format!("Deputado {id:03}"), "SP", Role::Deputy));
            source
                .expenses
                .insert(id, vec![expense(id, year, 3, 1_000)]);
            source.votes.insert(id, vec![vote(id, "Sim", vote_date)]);
        }
        source
    }
}

#[async_trait]
impl LegislatureSource for ScriptedSource {
    async fn fetch_deputies(&self) -> Result<Vec<Politician>, SourceError> {
        if self.deputies_down {
            return Err(unavailable("deputados"));
        }
        Ok(self.deputies.clone())
    }

    async fn fetch_senators(&self) -> Result<Vec<Politician>, SourceError> {
        if self.senators_down {
            return Err(unavailable("senadores"));
        }
        Ok(self.senators.clone())
    }

    async fn fetch_expenses(
        &self,
        politician_id: i64,
        _year: i32,
    ) -> Result<Vec<RawExpense>, SourceError> {
        if self.failing_expenses.contains(&politician_id) {
            return Err(unavailable("despesas"));
        }
        Ok(self.expenses.get(&politician_id).cloned().unwrap_or_default())
    }

    async fn fetch_votes(
        &self,
        politician_id: i64,
        _today: NaiveDate,
    ) -> Result<Vec<RawVote>, SourceError> {
        if self.failing_votes.contains(&politician_id) {
            return Err(unavailable("votacoes"));
        }
        Ok(self.votes.get(&politician_id).cloned().unwrap_or_default())
    }

    async fn fetch_recent_propositions(
        &self,
        limit: usize,
        _today: NaiveDate,
    ) -> Result<Vec<Proposition>, SourceError> {
        if self.propositions_down {
            return Err(unavailable("proposicoes"));
        }
        Ok(self.propositions.iter().take(limit).cloned().collect())
    }
}
