//! In-memory [`Store`] for unit tests.

use anyhow::{anyhow, Result};
use std::sync::Mutex;

use crate::store::{unique, Employee, JobOption, NewMaterial, NewTimeLog, Store};

struct JobRecord {
    id: String,
    job_name: String,
    status: String,
    created_seq: u64,
}

struct EmployeeRecord {
    id: String,
    pin: String,
    active: bool,
}

#[derive(Default)]
struct State {
    jobs: Vec<JobRecord>,
    employees: Vec<EmployeeRecord>,
    time_logs: Vec<NewTimeLog>,
    materials: Vec<NewMaterial>,
    /// Every store call, in order.
    calls: Vec<&'static str>,
    read_error: Option<String>,
    lookup_error: Option<String>,
    time_log_error: Option<String>,
    material_error: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_job(&self, id: &str, job_name: &str, status: &str, created_seq: u64) {
        self.state.lock().unwrap().jobs.push(JobRecord {
            id: id.into(),
            job_name: job_name.into(),
            status: status.into(),
            created_seq,
        });
    }

    pub fn add_employee(&self, id: &str, pin: &str, active: bool) {
        self.state.lock().unwrap().employees.push(EmployeeRecord {
            id: id.into(),
            pin: pin.into(),
            active,
        });
    }

    pub fn fail_reads(&self, msg: &str) {
        self.state.lock().unwrap().read_error = Some(msg.into());
    }

    pub fn fail_lookup(&self, msg: &str) {
        self.state.lock().unwrap().lookup_error = Some(msg.into());
    }

    pub fn fail_time_logs(&self, msg: &str) {
        self.state.lock().unwrap().time_log_error = Some(msg.into());
    }

    pub fn fail_materials(&self, msg: &str) {
        self.state.lock().unwrap().material_error = Some(msg.into());
    }

    pub fn time_logs(&self) -> Vec<NewTimeLog> {
        self.state.lock().unwrap().time_logs.clone()
    }

    pub fn materials(&self) -> Vec<NewMaterial> {
        self.state.lock().unwrap().materials.clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl Store for MemoryStore {
    async fn open_jobs(&self) -> Result<Vec<JobOption>> {
        let mut st = self.state.lock().unwrap();
        st.calls.push("open_jobs");
        if let Some(e) = &st.read_error {
            return Err(anyhow!(e.clone()));
        }
        let mut open: Vec<&JobRecord> = st.jobs.iter().filter(|j| j.status == "open").collect();
        open.sort_by(|a, b| b.created_seq.cmp(&a.created_seq));
        Ok(open
            .into_iter()
            .map(|j| JobOption {
                id: j.id.clone(),
                job_name: j.job_name.clone(),
            })
            .collect())
    }

    async fn find_active_employee(&self, pin: &str) -> Result<Option<Employee>> {
        let mut st = self.state.lock().unwrap();
        st.calls.push("find_active_employee");
        if let Some(e) = &st.lookup_error {
            return Err(anyhow!(e.clone()));
        }
        let matches: Vec<Employee> = st
            .employees
            .iter()
            .filter(|e| e.active && e.pin == pin)
            .map(|e| Employee { id: e.id.clone() })
            .collect();
        Ok(unique(matches))
    }

    async fn insert_time_log(&self, entry: &NewTimeLog) -> Result<()> {
        let mut st = self.state.lock().unwrap();
        st.calls.push("insert_time_log");
        if let Some(e) = &st.time_log_error {
            return Err(anyhow!(e.clone()));
        }
        if !st.jobs.iter().any(|j| j.id == entry.job_id) {
            return Err(anyhow!("job {} does not exist", entry.job_id));
        }
        st.time_logs.push(entry.clone());
        Ok(())
    }

    async fn insert_material(&self, entry: &NewMaterial) -> Result<()> {
        let mut st = self.state.lock().unwrap();
        st.calls.push("insert_material");
        if let Some(e) = &st.material_error {
            return Err(anyhow!(e.clone()));
        }
        st.materials.push(entry.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        match &self.state.lock().unwrap().read_error {
            Some(e) => Err(anyhow!(e.clone())),
            None => Ok(()),
        }
    }
}
