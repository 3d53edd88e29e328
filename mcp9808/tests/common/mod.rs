#![allow(dead_code)]

use mcp9808::{Smbus, SmbusHandle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BusError {
    Unavailable,
    Nack,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Open(u8),
    ReadByte(u8, u8),
    ReadWord(u8, u8),
    WriteByte(u8, u8, u8),
    WriteWord(u8, u8, u16),
    Close,
}

/// Stand-in transport that records every open, transfer and close.
#[derive(Debug, Default)]
pub struct RecordingBus {
    pub log: Vec<Op>,
    pub byte: u8,
    pub word: u16,
    pub fail_open: bool,
    pub fail_transfer: bool,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word(word: u16) -> Self {
        RecordingBus {
            word,
            ..Self::default()
        }
    }

    pub fn transfers(&self) -> Vec<Op> {
        self.log
            .iter()
            .filter(|op| !matches!(op, Op::Open(_) | Op::Close))
            .copied()
            .collect()
    }

    pub fn opens(&self) -> usize {
        self.log.iter().filter(|op| matches!(op, Op::Open(_))).count()
    }

    pub fn closes(&self) -> usize {
        self.log.iter().filter(|op| matches!(op, Op::Close)).count()
    }
}

impl Smbus for RecordingBus {
    type Error = BusError;
    type Handle<'a> = RecordingHandle<'a> where Self: 'a;

    fn open(&mut self, bus: u8) -> Result<Self::Handle<'_>, Self::Error> {
        if self.fail_open {
            return Err(BusError::Unavailable);
        }

        self.log.push(Op::Open(bus));
        Ok(RecordingHandle { bus: self })
    }
}

pub struct RecordingHandle<'a> {
    bus: &'a mut RecordingBus,
}

impl RecordingHandle<'_> {
    fn transfer<T>(&mut self, op: Op, val: T) -> Result<T, BusError> {
        self.bus.log.push(op);

        if self.bus.fail_transfer {
            Err(BusError::Nack)
        } else {
            Ok(val)
        }
    }
}

impl SmbusHandle for RecordingHandle<'_> {
    type Error = BusError;

    fn read_byte_data(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        let byte = self.bus.byte;
        self.transfer(Op::ReadByte(address, register), byte)
    }

    fn read_word_data(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        let word = self.bus.word;
        self.transfer(Op::ReadWord(address, register), word)
    }

    fn write_byte_data(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.transfer(Op::WriteByte(address, register, value), ())
    }

    fn write_word_data(&mut self, address: u8, register: u8, value: u16) -> Result<(), Self::Error> {
        self.transfer(Op::WriteWord(address, register, value), ())
    }
}

impl Drop for RecordingHandle<'_> {
    fn drop(&mut self) {
        self.bus.log.push(Op::Close);
    }
}
