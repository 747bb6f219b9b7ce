//! Worker-count sizing from host CPU and memory capacity.
//!
//! Each inference worker is a separate process holding its own copy of an
//! embedding model, so the pool size is bounded by memory as much as by
//! cores. The sizing function is pure; detection of the actual host
//! capacity lives in separate helpers so callers (and tests) can supply
//! their own figures.

use tracing::debug;

use crate::defaults::{FALLBACK_SYSTEM_RAM_MB, SYSTEM_RESERVED_MB, WORKER_HARD_CAP, WORKER_MEMORY_MB};

/// Compute a worker count from host capacity.
///
/// Takes the smaller of the CPU-bound and memory-bound counts, clamped to
/// `[1, hard_cap]`. Memory sizing reserves [`SYSTEM_RESERVED_MB`] for the
/// host process and OS before dividing by the per-worker estimate.
pub fn recommended_worker_count(
    cpu_count: usize,
    available_memory_mb: u64,
    per_worker_memory_mb: u64,
    hard_cap: usize,
) -> usize {
    let hard_cap = hard_cap.max(1);
    let by_cpu = cpu_count.min(hard_cap);

    // On hosts smaller than the reserve itself, assume the reserve as the
    // usable pool rather than refusing to start.
    let usable_mb = if available_memory_mb > SYSTEM_RESERVED_MB {
        available_memory_mb - SYSTEM_RESERVED_MB
    } else {
        SYSTEM_RESERVED_MB
    };
    let by_memory = if per_worker_memory_mb == 0 {
        hard_cap
    } else {
        (usable_mb / per_worker_memory_mb) as usize
    };

    by_cpu.min(by_memory).clamp(1, hard_cap)
}

/// Worker count for this host using the default per-worker estimate and cap.
pub fn default_worker_count() -> usize {
    let cpu = detect_cpu_count();
    let ram = detect_system_ram_mb();
    let count = recommended_worker_count(cpu, ram, WORKER_MEMORY_MB, WORKER_HARD_CAP);
    debug!(
        cpu_count = cpu,
        system_ram_mb = ram,
        worker_count = count,
        "Sized worker pool from host capacity"
    );
    count
}

/// Number of logical CPUs, 1 if detection fails.
pub fn detect_cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

/// Total system RAM in MB, [`FALLBACK_SYSTEM_RAM_MB`] if detection fails.
pub fn detect_system_ram_mb() -> u64 {
    if let Ok(content) = std::fs::read_to_string("/proc/meminfo") {
        for line in content.lines() {
            if let Some(rest) = line.strip_prefix("MemTotal:") {
                let mut parts = rest.split_whitespace();
                if let Some(kb) = parts.next().and_then(|v| v.parse::<u64>().ok()) {
                    return kb / 1024;
                }
            }
        }
    }

    FALLBACK_SYSTEM_RAM_MB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_bound_sizing() {
        // Plenty of memory: CPU count wins, capped at 6
        assert_eq!(recommended_worker_count(4, 32_768, 200, 6), 4);
        assert_eq!(recommended_worker_count(16, 32_768, 200, 6), 6);
    }

    #[test]
    fn test_memory_bound_sizing() {
        // 3 GB total: 1 GB usable after the 2 GB reserve -> 5 workers at 200 MB
        assert_eq!(recommended_worker_count(8, 3072, 200, 6), 5);
        // 2.2 GB total: 200 MB usable -> 1 worker
        assert_eq!(recommended_worker_count(8, 2248, 200, 6), 1);
    }

    #[test]
    fn test_minimum_one_worker() {
        assert_eq!(recommended_worker_count(0, 0, 200, 6), 1);
        assert_eq!(recommended_worker_count(1, 128, 200, 6), 1);
    }

    #[test]
    fn test_hard_cap_applies() {
        assert_eq!(recommended_worker_count(64, 1_048_576, 200, 6), 6);
        assert_eq!(recommended_worker_count(64, 1_048_576, 200, 3), 3);
    }

    #[test]
    fn test_zero_hard_cap_treated_as_one() {
        assert_eq!(recommended_worker_count(4, 8192, 200, 0), 1);
    }

    #[test]
    fn test_zero_per_worker_memory_falls_back_to_cpu() {
        assert_eq!(recommended_worker_count(4, 8192, 0, 6), 4);
    }

    #[test]
    fn test_heavier_models_shrink_the_pool() {
        let light = recommended_worker_count(6, 4096, 200, 6);
        let heavy = recommended_worker_count(6, 4096, 420, 6);
        assert!(heavy <= light);
    }

    #[test]
    fn test_detection_helpers_return_sane_values() {
        assert!(detect_cpu_count() >= 1);
        assert!(detect_system_ram_mb() > 0);
    }
}
