//! Core emulator primitives and traits.

pub mod apu;
pub mod cpu_6502;
pub mod cpu_65c816;
pub mod cpu_8080;
pub mod cpu_8086;
pub mod cpu_8086_protected;
pub mod cpu_mips_r4300i;
pub mod cpu_z80;
pub mod graphics;
pub mod logging;
pub mod ppu;
pub mod renderer;

pub mod types {
    use serde::{Deserialize, Serialize};

    /// An RGBA8888 framebuffer handed to the host by value at frame end.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; (width * height) as usize],
            }
        }
    }

    pub type AudioSample = i16;

    /// Frame-end video handoff. `data` is an owned pixel buffer.
    pub struct VideoInfo {
        pub width: u32,
        pub height: u32,
        pub data: Vec<u32>,
    }

    /// Stereo interleaved signed 16-bit samples at 48 kHz.
    pub struct AudioInfo {
        pub data: Vec<AudioSample>,
    }

    /// Input query for a single button or axis.
    pub struct InputInfo {
        pub button: u8,
    }

    pub type VideoCallback = Box<dyn FnMut(VideoInfo) + Send>;
    pub type AudioCallback = Box<dyn FnMut(AudioInfo) + Send>;
    pub type PollInputCallback = Box<dyn FnMut() + Send>;
    /// Returns analog axes in [-127, 127]; buttons report 0/1.
    pub type ReadInputCallback = Box<dyn FnMut(InputInfo) -> i8 + Send>;
}

pub mod state {
    //! Helpers for the contiguous save-state byte stream: architectural
    //! registers in declaration order, then owned RAM regions.

    pub fn put_u8(stream: &mut Vec<u8>, v: u8) {
        stream.push(v);
    }

    pub fn put_bool(stream: &mut Vec<u8>, v: bool) {
        stream.push(v as u8);
    }

    pub fn put_u16(stream: &mut Vec<u8>, v: u16) {
        stream.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_u32(stream: &mut Vec<u8>, v: u32) {
        stream.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_u64(stream: &mut Vec<u8>, v: u64) {
        stream.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_bytes(stream: &mut Vec<u8>, v: &[u8]) {
        stream.extend_from_slice(v);
    }

    /// Sequential reader over a save-state stream. Accessors return `None`
    /// once the stream is exhausted; callers map that to their own
    /// truncated-state error.
    pub struct Reader<'a> {
        buf: &'a [u8],
        pos: usize,
    }

    impl<'a> Reader<'a> {
        pub fn new(buf: &'a [u8]) -> Self {
            Self { buf, pos: 0 }
        }

        pub fn take_u8(&mut self) -> Option<u8> {
            let v = *self.buf.get(self.pos)?;
            self.pos += 1;
            Some(v)
        }

        pub fn take_bool(&mut self) -> Option<bool> {
            self.take_u8().map(|v| v != 0)
        }

        pub fn take_u16(&mut self) -> Option<u16> {
            let bytes = self.buf.get(self.pos..self.pos + 2)?;
            self.pos += 2;
            Some(u16::from_le_bytes([bytes[0], bytes[1]]))
        }

        pub fn take_u32(&mut self) -> Option<u32> {
            let bytes = self.buf.get(self.pos..self.pos + 4)?;
            self.pos += 4;
            Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        }

        pub fn take_u64(&mut self) -> Option<u64> {
            let bytes = self.buf.get(self.pos..self.pos + 8)?;
            self.pos += 8;
            let mut arr = [0u8; 8];
            arr.copy_from_slice(bytes);
            Some(u64::from_le_bytes(arr))
        }

        pub fn take_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
            let bytes = self.buf.get(self.pos..self.pos + len)?;
            self.pos += len;
            Some(bytes)
        }

        pub fn remaining(&self) -> usize {
            self.buf.len() - self.pos
        }
    }
}

use std::sync::Mutex;

/// A CPU-like component that can be stepped; returns cycles consumed.
pub trait Cpu {
    fn reset(&mut self);
    fn step(&mut self) -> u32;
}

/// Description of a mount point (media slot) that a system supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPointInfo {
    /// Unique identifier for this mount point (e.g., "Cartridge", "BIOS")
    pub id: String,
    /// User-friendly name for display (e.g., "Cartridge Slot")
    pub name: String,
    /// File extensions accepted by this mount point (e.g., ["gb", "gbc"])
    pub extensions: Vec<String>,
    /// Whether this mount point is required for the system to function
    pub required: bool,
}

/// A high-level System trait tying components together.
pub trait System {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reset to initial power-on state
    fn reset(&mut self);

    /// Emulate until a frame is produced and return a framebuffer.
    fn step_frame(&mut self) -> Result<types::Frame, Self::Error>;

    /// Append the full architectural state to `stream`: registers in
    /// declaration order followed by owned RAM regions, no endianness tag.
    /// Save states do NOT include ROM/cartridge data.
    fn save_state(&self, stream: &mut Vec<u8>);

    /// Restore state from a stream produced by `save_state`.
    fn load_state(&mut self, stream: &[u8]) -> Result<(), Self::Error>;

    /// Check if this system supports save/load state functionality
    fn supports_save_states(&self) -> bool {
        false
    }

    /// JSON diagnostic snapshot for debugging frontends. Not a save state.
    fn debug_state(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Get the list of mount points this system supports
    fn mount_points(&self) -> Vec<MountPointInfo>;

    /// Load media into a specific mount point
    fn mount(&mut self, mount_point_id: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Unload media from a specific mount point
    fn unmount(&mut self, mount_point_id: &str) -> Result<(), Self::Error>;

    /// Check if a mount point has media loaded
    fn is_mounted(&self, mount_point_id: &str) -> bool;
}

/// Producer/consumer queue between an audio-producing core and the host
/// device callback. The producer appends interleaved stereo samples; the
/// consumer drains `min(frames * 2, queued)` samples per callback.
pub struct SampleQueue {
    samples: Mutex<Vec<types::AudioSample>>,
}

impl SampleQueue {
    pub fn new() -> Self {
        Self {
            samples: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, samples: &[types::AudioSample]) {
        self.samples.lock().unwrap().extend_from_slice(samples);
    }

    pub fn drain(&self, frames: usize) -> Vec<types::AudioSample> {
        let mut queue = self.samples.lock().unwrap();
        let count = (frames * 2).min(queue.len());
        queue.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.samples.lock().unwrap().clear();
    }
}

impl Default for SampleQueue {
    fn default() -> Self {
        Self::new()
    }
}
