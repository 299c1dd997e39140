//! Integration tests for staging, promotion, and cleanup of whole jobs.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use maildetach::error::{DetachError, ExitStatus};
use maildetach::pipeline::{process, run_job, JobOptions};
use tempfile::tempdir;

use common::{entries, job, message};

// ─── End-to-end: two attachments, one without a name ────────────────

#[test]
fn test_end_to_end_two_attachments() {
    let dest = tempdir().unwrap();
    let job = job(dest.path(), 4321);
    let work_dir = job.work_dir.clone();
    let raw = message(&[("report.pdf", b"A"), ("", b"B")]);

    let result = run_job(job, &raw[..], &JobOptions::default());
    assert_eq!(ExitStatus::from(&result).code(), 0);

    let report = result.unwrap();
    assert_eq!(report.message_id.as_deref(), Some("test-1@example.com"));
    assert_eq!(
        report.files,
        [
            "20240229-235958-4321-0000-report.pdf",
            "20240229-235958-4321-0001"
        ]
    );

    assert_eq!(entries(dest.path()), report.files);
    assert_eq!(std::fs::read(dest.path().join(&report.files[0])).unwrap(), b"A");
    assert_eq!(std::fs::read(dest.path().join(&report.files[1])).unwrap(), b"B");
    assert!(!work_dir.exists());
}

// ─── Naming is injective ────────────────────────────────────────────

#[test]
fn test_duplicate_and_missing_names_stay_distinct() {
    let dest = tempdir().unwrap();
    let raw = message(&[
        ("dup.txt", b"one"),
        ("dup.txt", b"two"),
        ("", b"three"),
        ("", b"four"),
    ]);

    let report = run_job(job(dest.path(), 1), &raw[..], &JobOptions::default()).unwrap();

    let prefix = "20240229-235958-1-";
    assert_eq!(report.files.len(), 4);
    for (i, name) in report.files.iter().enumerate() {
        assert!(name.starts_with(&format!("{prefix}{i:04}")), "{name}");
    }
    assert_eq!(entries(dest.path()).len(), 4);
    assert_eq!(
        std::fs::read(dest.path().join(&report.files[1])).unwrap(),
        b"two"
    );
}

// ─── Multibyte names stay within the file name limit ────────────────

#[test]
fn test_multibyte_name_is_delivered() {
    let dest = tempdir().unwrap();
    let job = job(dest.path(), 4242);
    let work_dir = job.work_dir.clone();
    // 70 four-byte characters: 280 bytes, past NAME_MAX once prefixed.
    let name = "😀".repeat(70);
    let raw = message(&[(&name, b"smile")]);

    let report = run_job(job, &raw[..], &JobOptions::default()).unwrap();

    let expected = format!(
        "20240229-235958-4242-0000-{}..{}",
        "😀".repeat(7),
        "😀".repeat(7)
    );
    assert_eq!(report.files, [expected.clone()]);
    assert!(expected.len() <= 255);
    assert_eq!(std::fs::read(dest.path().join(&expected)).unwrap(), b"smile");
    assert!(!work_dir.exists());
}

// ─── Failures: exit 75 and no workspace left behind ─────────────────

#[test]
fn test_missing_dest_dir() {
    let root = tempdir().unwrap();
    let missing = root.path().join("does-not-exist");

    let result = process(&message(&[("a", b"A")])[..], &missing, &JobOptions::default());
    assert!(matches!(result, Err(DetachError::Workspace { .. })));
    assert_eq!(ExitStatus::from(&result).code(), 75);
    assert!(entries(root.path()).is_empty());
}

#[test]
fn test_parse_failure_cleans_up() {
    let dest = tempdir().unwrap();
    let job = job(dest.path(), 2);
    let work_dir = job.work_dir.clone();

    let result = run_job(job, &b""[..], &JobOptions::default());
    assert!(matches!(result, Err(DetachError::Parse(_))));
    assert_eq!(ExitStatus::from(&result), ExitStatus::TempFail);
    assert!(!work_dir.exists());
    assert!(entries(dest.path()).is_empty());
}

#[test]
fn test_promotion_failure_cleans_up() {
    let dest = tempdir().unwrap();
    let job = job(dest.path(), 3);
    let work_dir = job.work_dir.clone();

    // Occupy the name the second attachment will be promoted to.
    let clash = dest.path().join("20240229-235958-3-0001-b.txt");
    std::fs::write(&clash, b"already here").unwrap();

    let raw = message(&[("a.txt", b"A"), ("b.txt", b"B"), ("c.txt", b"C")]);
    let result = run_job(job, &raw[..], &JobOptions::default());

    assert!(matches!(result, Err(DetachError::Link { .. })));
    assert_eq!(ExitStatus::from(&result).code(), 75);
    assert!(!work_dir.exists());

    // No rollback: the first file stays delivered, the third never appears.
    assert_eq!(
        entries(dest.path()),
        [
            "20240229-235958-3-0000-a.txt",
            "20240229-235958-3-0001-b.txt"
        ]
    );
    assert_eq!(std::fs::read(&clash).unwrap(), b"already here");
}

// ─── Concurrent jobs never overwrite each other ─────────────────────

#[test]
fn test_concurrent_jobs_same_original_name() {
    let dest = tempdir().unwrap();

    let handles: Vec<_> = [(100u32, b"first"), (200u32, b"other")]
        .into_iter()
        .map(|(pid, content)| {
            let job = job(dest.path(), pid);
            let raw = message(&[("invoice.pdf", content)]);
            thread::spawn(move || run_job(job, &raw[..], &JobOptions::default()))
        })
        .collect();

    for h in handles {
        h.join().unwrap().unwrap();
    }

    let names = entries(dest.path());
    assert_eq!(
        names,
        [
            "20240229-235958-100-0000-invoice.pdf",
            "20240229-235958-200-0000-invoice.pdf"
        ]
    );
    assert_eq!(std::fs::read(dest.path().join(&names[0])).unwrap(), b"first");
    assert_eq!(std::fs::read(dest.path().join(&names[1])).unwrap(), b"other");
}

// ─── Readers never see a partial file ───────────────────────────────

#[test]
fn test_promotion_is_atomic_for_readers() {
    let dest = tempdir().unwrap();
    let big: Vec<u8> = b"0123456789abcdef"
        .iter()
        .copied()
        .cycle()
        .take(8 * 1024 * 1024)
        .collect();
    let expected_len = big.len() as u64;
    let raw = message(&[("big.bin", &big), ("small.bin", b"s")]);

    let done = Arc::new(AtomicBool::new(false));
    let poller = {
        let done = Arc::clone(&done);
        let dir = dest.path().to_path_buf();
        thread::spawn(move || {
            let mut violations = Vec::new();
            while !done.load(Ordering::Acquire) {
                for entry in std::fs::read_dir(&dir).unwrap().flatten() {
                    let Ok(meta) = entry.metadata() else { continue };
                    if !meta.is_file() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy().into_owned();
                    let want = if name.ends_with("big.bin") { expected_len } else { 1 };
                    if meta.len() != want {
                        violations.push((name, meta.len()));
                    }
                }
            }
            violations
        })
    };

    let report = run_job(job(dest.path(), 5), &raw[..], &JobOptions::default()).unwrap();
    done.store(true, Ordering::Release);

    let violations = poller.join().unwrap();
    assert!(violations.is_empty(), "partial files seen: {violations:?}");
    assert_eq!(std::fs::read(dest.path().join(&report.files[0])).unwrap(), big);
}
