//! Tests for miscellaneous instructions
//!
//! This module contains tests for system instructions, I/O, MMX, and special operations

use crate::cpu_8086::{Cpu8086, CpuModel, FLAG_CF, FLAG_ZF, FLAG_SF, FLAG_OF, FLAG_PF, FLAG_AF};
use crate::cpu_8086::ArrayMemory;

#[test]
fn test_placeholder_misc() {
    // Placeholder test - will be populated with extracted tests
    let mem = ArrayMemory::new();
    let cpu = Cpu8086::new(mem);
    assert!(cpu.cycles == 0);
}
