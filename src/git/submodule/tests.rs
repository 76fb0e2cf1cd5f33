// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::{Arc, Mutex};
use std::thread;

use super::{SubmoduleQueue, SubmoduleRequest, WorkerState};
use crate::core::process::{ProcessBuilder, ProcessOutput, ProcessRunner};
use crate::error::MobResult;
use crate::git::test_utils::RecordingRunner;

fn request(name: &str) -> SubmoduleRequest {
    SubmoduleRequest::builder()
        .url(format!("https://example.com/{name}.git"))
        .name(name)
        .root("/build/modorganizer_super")
        .build()
}

/// Names passed to `--name`, in invocation order.
fn submodule_names(calls: &[String]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|c| c.split(" --name ").nth(1))
        .filter_map(|rest| rest.split(' ').next())
        .map(ToString::to_string)
        .collect()
}

/// Blocks every invocation until the test releases it.
struct GateRunner {
    started: flume::Sender<String>,
    release: flume::Receiver<()>,
    names: Mutex<Vec<String>>,
}

impl ProcessRunner for GateRunner {
    fn run(&self, process: &ProcessBuilder) -> MobResult<ProcessOutput> {
        let names = submodule_names(&[process.arguments().join(" ")]);
        let name = names.first().cloned().unwrap_or_default();
        self.names.lock().expect("names lock").push(name.clone());
        let _ = self.started.send(name);
        let _ = self.release.recv();
        Ok(ProcessOutput::default())
    }
}

#[test]
fn test_request_defaults_to_master() {
    let req = request("usvfs");
    assert_eq!(req.branch(), "master");
    assert_eq!(req.url(), "https://example.com/usvfs.git");
    assert_eq!(req.root(), std::path::Path::new("/build/modorganizer_super"));
}

#[test]
fn test_request_runs_submodule_add() {
    let runner = RecordingRunner::new();
    SubmoduleRequest::builder()
        .url("https://example.com/usvfs.git")
        .branch("dev")
        .name("usvfs")
        .root("/build/super")
        .build()
        .run(&runner)
        .expect("submodule add should succeed");

    insta::assert_debug_snapshot!(runner.calls(), @r#"
    [
        "-c core.autocrlf=false submodule --quiet add -b dev --force --name usvfs https://example.com/usvfs.git usvfs",
    ]
    "#);
}

#[test]
fn test_queue_runs_requests_in_order() {
    let runner = Arc::new(RecordingRunner::new());
    let queue = SubmoduleQueue::start(runner.clone()).expect("start worker");
    assert_eq!(queue.state(), WorkerState::Idle);

    for name in ["a", "b", "c"] {
        queue.enqueue(request(name));
    }
    let handle = queue.handle();
    queue.finish();

    assert_eq!(submodule_names(&runner.calls()), ["a", "b", "c"]);
    assert_eq!(handle.state(), WorkerState::Stopped);
}

#[test]
fn test_handle_enqueues_from_other_threads() {
    let runner = Arc::new(RecordingRunner::new());
    let queue = SubmoduleQueue::start(runner.clone()).expect("start worker");

    let handle = queue.handle();
    thread::spawn(move || {
        handle.enqueue(request("a"));
        handle.enqueue(request("b"));
    })
    .join()
    .expect("producer thread");

    queue.finish();
    assert_eq!(submodule_names(&runner.calls()), ["a", "b"]);
}

#[test]
fn test_stop_abandons_queued_requests() {
    let (started_tx, started_rx) = flume::unbounded();
    let (release_tx, release_rx) = flume::unbounded();
    let runner = Arc::new(GateRunner {
        started: started_tx,
        release: release_rx,
        names: Mutex::new(Vec::new()),
    });

    let queue = SubmoduleQueue::start(runner.clone()).expect("start worker");
    queue.enqueue(request("a"));
    queue.enqueue(request("b"));
    queue.enqueue(request("c"));

    // wait until "a" is running, then stop
    assert_eq!(started_rx.recv().expect("first request started"), "a");
    assert_eq!(queue.state(), WorkerState::Draining);
    queue.stop();
    release_tx.send(()).expect("release first request");

    let handle = queue.handle();
    drop(queue);

    assert_eq!(*runner.names.lock().expect("names lock"), ["a"]);
    assert_eq!(handle.state(), WorkerState::Stopped);
}

#[test]
fn test_drop_idle_queue_does_not_hang() {
    let runner = Arc::new(RecordingRunner::new());
    let queue = SubmoduleQueue::start(runner.clone()).expect("start worker");
    let handle = queue.handle();

    drop(queue);

    assert_eq!(handle.state(), WorkerState::Stopped);
    assert!(runner.calls().is_empty());
}

#[test]
fn test_enqueue_after_stop_is_dropped() {
    let runner = Arc::new(RecordingRunner::new());
    let queue = SubmoduleQueue::start(runner.clone()).expect("start worker");
    let handle = queue.handle();

    queue.stop();
    queue.enqueue(request("late"));
    handle.enqueue(request("later"));
    drop(queue);

    assert!(runner.calls().is_empty());
}

#[test]
fn test_failed_request_stops_worker() {
    let runner = Arc::new(RecordingRunner::new().respond(
        "-c core.autocrlf=false submodule --quiet add -b broken",
        128,
        "",
    ));
    let queue = SubmoduleQueue::start(runner.clone()).expect("start worker");
    let handle = queue.handle();

    queue.enqueue(request("a"));
    queue.enqueue(
        SubmoduleRequest::builder()
            .url("https://example.com/b.git")
            .branch("broken")
            .name("b")
            .root("/build/modorganizer_super")
            .build(),
    );
    queue.enqueue(request("c"));
    queue.finish();

    assert_eq!(submodule_names(&runner.calls()), ["a", "b"]);
    assert_eq!(handle.state(), WorkerState::Stopped);

    // worker is gone, nothing runs anymore
    handle.enqueue(request("d"));
    assert_eq!(runner.calls().len(), 2);
}
