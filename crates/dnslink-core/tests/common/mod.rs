//! Test doubles and common utilities for contract tests
//!
//! The fakes keep their state behind `Arc`s so a test can hand one copy to the
//! code under test and keep another for assertions.

#![allow(dead_code)]

use dnslink_core::error::{Error, Result};
use dnslink_core::traits::{CommandOutput, CommandRunner, DnsProvider, DnsRecord};
use dnslink_core::RunConfig;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Which provider operation should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    List,
    Create,
    Edit,
}

/// A write issued against the fake provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Create {
        zone_id: String,
        name: String,
        content: String,
    },
    Edit {
        zone_id: String,
        record_id: String,
        name: String,
        content: String,
    },
}

/// An in-memory DnsProvider that tracks calls
pub struct InMemoryDnsProvider {
    /// Records per zone, in list order
    records: Arc<Mutex<Vec<(String, DnsRecord)>>>,
    list_call_count: Arc<AtomicUsize>,
    writes: Arc<Mutex<Vec<WriteCall>>>,
    next_id: Arc<AtomicUsize>,
    fail_on: Option<FailOn>,
}

impl InMemoryDnsProvider {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
            fail_on: None,
        }
    }

    /// Seed the provider with existing records in `zone_id`
    pub fn with_records(zone_id: &str, records: Vec<DnsRecord>) -> Self {
        let provider = Self::new();
        provider
            .records
            .lock()
            .unwrap()
            .extend(records.into_iter().map(|r| (zone_id.to_string(), r)));
        provider
    }

    /// Make one operation fail with a provider error
    pub fn failing_on(mut self, op: FailOn) -> Self {
        self.fail_on = Some(op);
        self
    }

    /// Create a provider that shares records and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            records: Arc::clone(&other.records),
            list_call_count: Arc::clone(&other.list_call_count),
            writes: Arc::clone(&other.writes),
            next_id: Arc::clone(&other.next_id),
            fail_on: other.fail_on,
        }
    }

    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Number of create and edit calls
    pub fn write_call_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }

    /// Current records in `zone_id`, in list order
    pub fn records(&self, zone_id: &str) -> Vec<DnsRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(zone, _)| zone == zone_id)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn check(&self, op: FailOn) -> Result<()> {
        if self.fail_on == Some(op) {
            return Err(Error::provider("in-memory", format!("{:?} failed", op)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsProvider for InMemoryDnsProvider {
    async fn list_txt_records(&self, zone_id: &str, name: &str) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        self.check(FailOn::List)?;

        Ok(self
            .records(zone_id)
            .into_iter()
            .filter(|r| r.name == name && r.record_type == "TXT")
            .collect())
    }

    async fn create_txt_record(
        &self,
        zone_id: &str,
        name: &str,
        content: &str,
    ) -> Result<DnsRecord> {
        self.writes.lock().unwrap().push(WriteCall::Create {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        });
        self.check(FailOn::Create)?;

        let id = format!("created-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = DnsRecord::txt(id, name, content);
        self.records
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record.clone()));
        Ok(record)
    }

    async fn edit_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<DnsRecord> {
        self.writes.lock().unwrap().push(WriteCall::Edit {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        });
        self.check(FailOn::Edit)?;

        let mut records = self.records.lock().unwrap();
        let (_, record) = records
            .iter_mut()
            .find(|(zone, r)| zone == zone_id && r.id == record_id)
            .ok_or_else(|| Error::not_found(format!("DNS record not found: {}", record_id)))?;

        record.name = name.to_string();
        record.content = content.to_string();
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "in-memory"
    }
}

/// A recorded command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// A CommandRunner that replays scripted outputs in order
pub struct ScriptedCommandRunner {
    responses: Arc<Mutex<VecDeque<Result<CommandOutput>>>>,
    calls: Arc<Mutex<Vec<RecordedCommand>>>,
}

impl ScriptedCommandRunner {
    pub fn new(responses: Vec<Result<CommandOutput>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A runner where `space add` succeeds and `up` prints `stdout`
    pub fn uploading(stdout: &str) -> Self {
        Self::new(vec![
            Ok(CommandOutput::success("")),
            Ok(CommandOutput::success(stdout)),
        ])
    }

    /// Create a runner that shares its script and call log with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            responses: Arc::clone(&other.responses),
            calls: Arc::clone(&other.calls),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl CommandRunner for ScriptedCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(RecordedCommand {
            program: program.to_string(),
            args: args.to_vec(),
            env: env.to_vec(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::upload("unexpected command")))
    }
}

/// Upload JSON as printed by `up --json`
pub fn upload_json(cid: &str) -> String {
    format!(r#"{{"root":{{"/":"{}"}}}}"#, cid)
}

/// Helper to create a complete RunConfig for testing
pub fn test_config() -> RunConfig {
    RunConfig {
        directory: "dist".to_string(),
        dns_api_token: "test-token".to_string(),
        zone_id: "zone-1".to_string(),
        zone_name: "_dnslink.example.com".to_string(),
        upload_principal: "MgCtestkey".to_string(),
        upload_proof: "mAYIEAtestproof".to_string(),
        gateway_base: "https://w3s.link/ipfs/".to_string(),
        uploader_command: vec!["npx".to_string(), "@web3-storage/w3cli".to_string()],
        dry_run: false,
    }
}
