//! Tests for jump, call, return, and loop instructions
//!
//! This module contains tests for control flow instructions

use crate::cpu_8086::{Cpu8086, CpuModel, FLAG_CF, FLAG_ZF, FLAG_SF, FLAG_OF, FLAG_PF, FLAG_AF};
use crate::cpu_8086::ArrayMemory;

#[test]
fn test_placeholder_jumps() {
    // Placeholder test - will be populated with extracted tests
    let mem = ArrayMemory::new();
    let cpu = Cpu8086::new(mem);
    assert_eq!(cpu.ip, 0);
}
