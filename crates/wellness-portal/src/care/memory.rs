//! In-process repositories backing the API server, the CLI, and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};

use super::preventive::domain::{PatientId, PatientProfile, PreventiveRule, RuleId, TestRecord};
use super::preventive::repository::RuleRepository;
use super::provider::domain::{Advisory, AdvisoryId, ProviderId, ProviderProfile};
use super::provider::repository::{AdvisoryRepository, ProviderRepository};
use super::reminder::domain::{AdherenceRecord, Reminder, ReminderId};
use super::reminder::repository::ReminderRepository;
use super::repository::{PatientRepository, RepositoryError};
use super::wellness::domain::WellnessEntry;
use super::wellness::repository::{UpsertOutcome, WellnessEntryRepository};

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    store: &'static str,
) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} lock poisoned")))
}

#[derive(Default, Clone)]
pub struct MemoryPatientRepository {
    profiles: Arc<Mutex<BTreeMap<PatientId, PatientProfile>>>,
}

impl MemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatientRepository for MemoryPatientRepository {
    fn upsert(&self, profile: PatientProfile) -> Result<PatientProfile, RepositoryError> {
        let mut guard = lock(&self.profiles, "patient")?;
        guard.insert(profile.patient_id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &PatientId) -> Result<Option<PatientProfile>, RepositoryError> {
        let guard = lock(&self.profiles, "patient")?;
        Ok(guard.get(id).cloned())
    }

    fn record_test(
        &self,
        id: &PatientId,
        record: TestRecord,
    ) -> Result<PatientProfile, RepositoryError> {
        let mut guard = lock(&self.profiles, "patient")?;
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.last_tests.push(record);
        Ok(profile.clone())
    }

    fn all(&self) -> Result<Vec<PatientProfile>, RepositoryError> {
        let guard = lock(&self.profiles, "patient")?;
        Ok(guard.values().cloned().collect())
    }
}

/// Rules kept in insertion order so evaluation output is stable.
#[derive(Default, Clone)]
pub struct MemoryRuleRepository {
    rules: Arc<Mutex<Vec<PreventiveRule>>>,
}

impl MemoryRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleRepository for MemoryRuleRepository {
    fn insert(&self, rule: PreventiveRule) -> Result<PreventiveRule, RepositoryError> {
        let mut guard = lock(&self.rules, "rule")?;
        if guard.iter().any(|existing| existing.id == rule.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(rule.clone());
        Ok(rule)
    }

    fn update(&self, rule: PreventiveRule) -> Result<PreventiveRule, RepositoryError> {
        let mut guard = lock(&self.rules, "rule")?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == rule.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = rule.clone();
        Ok(rule)
    }

    fn fetch(&self, id: &RuleId) -> Result<Option<PreventiveRule>, RepositoryError> {
        let guard = lock(&self.rules, "rule")?;
        Ok(guard.iter().find(|rule| &rule.id == id).cloned())
    }

    fn enabled(&self) -> Result<Vec<PreventiveRule>, RepositoryError> {
        let guard = lock(&self.rules, "rule")?;
        Ok(guard.iter().filter(|rule| rule.enabled).cloned().collect())
    }

    fn all(&self) -> Result<Vec<PreventiveRule>, RepositoryError> {
        Ok(lock(&self.rules, "rule")?.clone())
    }
}

/// Daily entries keyed by patient then date, so range scans come back ordered.
#[derive(Default, Clone)]
pub struct MemoryWellnessRepository {
    entries: Arc<Mutex<BTreeMap<(PatientId, NaiveDate), WellnessEntry>>>,
}

impl MemoryWellnessRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WellnessEntryRepository for MemoryWellnessRepository {
    fn upsert_for_day(&self, entry: WellnessEntry) -> Result<UpsertOutcome, RepositoryError> {
        let mut guard = lock(&self.entries, "wellness")?;
        let key = (entry.patient_id.clone(), entry.date);
        Ok(match guard.insert(key, entry) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        })
    }

    fn fetch_day(
        &self,
        patient_id: &PatientId,
        date: NaiveDate,
    ) -> Result<Option<WellnessEntry>, RepositoryError> {
        let guard = lock(&self.entries, "wellness")?;
        Ok(guard.get(&(patient_id.clone(), date)).cloned())
    }

    fn entries_since(
        &self,
        patient_id: &PatientId,
        since: NaiveDate,
    ) -> Result<Vec<WellnessEntry>, RepositoryError> {
        let guard = lock(&self.entries, "wellness")?;
        Ok(guard
            .range((patient_id.clone(), since)..=(patient_id.clone(), NaiveDate::MAX))
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    fn recent(
        &self,
        patient_id: &PatientId,
        limit: usize,
    ) -> Result<Vec<WellnessEntry>, RepositoryError> {
        let guard = lock(&self.entries, "wellness")?;
        Ok(guard
            .range((patient_id.clone(), NaiveDate::MIN)..=(patient_id.clone(), NaiveDate::MAX))
            .rev()
            .take(limit)
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryProviderRepository {
    providers: Arc<Mutex<BTreeMap<ProviderId, ProviderProfile>>>,
}

impl MemoryProviderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProviderRepository for MemoryProviderRepository {
    fn upsert(&self, profile: ProviderProfile) -> Result<ProviderProfile, RepositoryError> {
        let mut guard = lock(&self.providers, "provider")?;
        guard.insert(profile.provider_id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &ProviderId) -> Result<Option<ProviderProfile>, RepositoryError> {
        let guard = lock(&self.providers, "provider")?;
        Ok(guard.get(id).cloned())
    }

    fn assign(
        &self,
        id: &ProviderId,
        patient_id: PatientId,
    ) -> Result<ProviderProfile, RepositoryError> {
        let mut guard = lock(&self.providers, "provider")?;
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.assign(patient_id);
        Ok(profile.clone())
    }
}

/// Advisories in insertion order.
#[derive(Default, Clone)]
pub struct MemoryAdvisoryRepository {
    advisories: Arc<Mutex<Vec<Advisory>>>,
}

impl MemoryAdvisoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdvisoryRepository for MemoryAdvisoryRepository {
    fn insert(&self, advisory: Advisory) -> Result<Advisory, RepositoryError> {
        let mut guard = lock(&self.advisories, "advisory")?;
        if guard.iter().any(|existing| existing.id == advisory.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(advisory.clone());
        Ok(advisory)
    }

    fn update(&self, advisory: Advisory) -> Result<Advisory, RepositoryError> {
        let mut guard = lock(&self.advisories, "advisory")?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == advisory.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = advisory.clone();
        Ok(advisory)
    }

    fn fetch(&self, id: &AdvisoryId) -> Result<Option<Advisory>, RepositoryError> {
        let guard = lock(&self.advisories, "advisory")?;
        Ok(guard.iter().find(|advisory| &advisory.id == id).cloned())
    }

    fn for_patient(&self, patient_id: &PatientId) -> Result<Vec<Advisory>, RepositoryError> {
        let guard = lock(&self.advisories, "advisory")?;
        Ok(guard
            .iter()
            .filter(|advisory| &advisory.patient_id == patient_id)
            .cloned()
            .collect())
    }
}

/// Reminders and adherence records, each in insertion order.
#[derive(Default, Clone)]
pub struct MemoryReminderRepository {
    reminders: Arc<Mutex<Vec<Reminder>>>,
    adherence: Arc<Mutex<Vec<AdherenceRecord>>>,
}

impl MemoryReminderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReminderRepository for MemoryReminderRepository {
    fn insert(&self, reminder: Reminder) -> Result<Reminder, RepositoryError> {
        let mut guard = lock(&self.reminders, "reminder")?;
        if guard.iter().any(|existing| existing.id == reminder.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(reminder.clone());
        Ok(reminder)
    }

    fn fetch(&self, id: &ReminderId) -> Result<Option<Reminder>, RepositoryError> {
        let guard = lock(&self.reminders, "reminder")?;
        Ok(guard.iter().find(|reminder| &reminder.id == id).cloned())
    }

    fn for_patient(&self, patient_id: &PatientId) -> Result<Vec<Reminder>, RepositoryError> {
        let guard = lock(&self.reminders, "reminder")?;
        Ok(guard
            .iter()
            .filter(|reminder| &reminder.patient_id == patient_id)
            .cloned()
            .collect())
    }

    fn record_adherence(
        &self,
        record: AdherenceRecord,
    ) -> Result<AdherenceRecord, RepositoryError> {
        let mut guard = lock(&self.adherence, "adherence")?;
        guard.push(record.clone());
        Ok(record)
    }

    fn adherence_since(
        &self,
        patient_id: &PatientId,
        since: DateTime<Utc>,
    ) -> Result<Vec<AdherenceRecord>, RepositoryError> {
        let guard = lock(&self.adherence, "adherence")?;
        Ok(guard
            .iter()
            .filter(|record| &record.patient_id == patient_id && record.timestamp >= since)
            .cloned()
            .collect())
    }
}
