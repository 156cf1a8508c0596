//! Simulated display controller
//!
//! Answers on one chip address. Writes to the DDC data address are treated
//! as DDC/CI packets, everything else is firmware memory.

use std::collections::BTreeMap;

use ddclink_hal::{I2cChannel, TransportStatus, DDC_CHIP_ADDRESS, DDC_DATA_ADDRESS};
use ddclink_protocol::{DdcPacket, VcpReply, VCP_BRIGHTNESS, VCP_REPLY_LEN};
use log::{debug, trace};

use crate::i2c::SimFault;
use crate::memory::EchoMemory;

/// Result code for an unsupported VCP control
const VCP_UNSUPPORTED: u8 = 0x01;

/// One recorded transfer attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Write attempt
    Write {
        /// Chip address
        chip: u8,
        /// Data address
        data_address: u32,
        /// Bytes written
        payload: Vec<u8>,
    },
    /// Read attempt
    Read {
        /// Chip address
        chip: u8,
        /// Read offset
        offset: u32,
        /// Requested length
        len: usize,
    },
}

/// Continuous VCP control state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Control {
    current: u16,
    maximum: u16,
}

/// Simulated display management interface
#[derive(Debug, Clone)]
pub struct SimDisplay {
    chip_address: u8,
    ddc_data_address: u32,
    controls: BTreeMap<u8, Control>,
    pending_reply: Option<[u8; VCP_REPLY_LEN]>,
    memory: EchoMemory,
    fault: Option<SimFault>,
    transfers: Vec<Transfer>,
}

impl Default for SimDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDisplay {
    /// Display at the DDC address with brightness 50 of 100
    pub fn new() -> Self {
        Self {
            chip_address: DDC_CHIP_ADDRESS,
            ddc_data_address: DDC_DATA_ADDRESS as u32,
            controls: BTreeMap::new(),
            pending_reply: None,
            memory: EchoMemory::new(),
            fault: None,
            transfers: Vec::new(),
        }
        .with_control(VCP_BRIGHTNESS, 50, 100)
    }

    /// Add or replace a continuous control
    pub fn with_control(mut self, code: u8, current: u16, maximum: u16) -> Self {
        self.controls.insert(
            code,
            Control {
                current: current.min(maximum),
                maximum,
            },
        );
        self
    }

    /// Answer on a different chip address
    pub fn with_chip_address(mut self, chip_address: u8) -> Self {
        self.chip_address = chip_address;
        self
    }

    /// Current value of a control
    pub fn control_value(&self, code: u8) -> Option<u16> {
        self.controls.get(&code).map(|c| c.current)
    }

    /// Make every following transfer fail with `fault`
    pub fn fail_with(&mut self, fault: SimFault) {
        self.fault = Some(fault);
    }

    /// Stop injecting faults
    pub fn clear_fault(&mut self) {
        self.fault = None;
    }

    /// Firmware memory
    pub fn memory(&self) -> &EchoMemory {
        &self.memory
    }

    /// Every transfer attempted so far, including failed ones
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Number of transfers attempted so far
    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }

    fn check(&self, chip_address: u8) -> Result<(), TransportStatus> {
        if let Some(fault) = self.fault {
            return Err(fault.into());
        }
        if chip_address != self.chip_address {
            return Err(SimFault::Nack.into());
        }
        Ok(())
    }

    fn handle_ddc(&mut self, payload: &[u8]) {
        let packet = match DdcPacket::decode(payload) {
            Ok(packet) => packet,
            Err(e) => {
                debug!("sim: ignoring malformed DDC packet: {}", e);
                return;
            }
        };

        match packet.value {
            None => {
                let reply = match self.controls.get(&packet.command) {
                    Some(control) => {
                        VcpReply::new(packet.command, control.current, control.maximum)
                    }
                    None => VcpReply {
                        result: VCP_UNSUPPORTED,
                        ..VcpReply::new(packet.command, 0, 0)
                    },
                };
                trace!("sim: staged reply for VCP 0x{:02X}", packet.command);
                self.pending_reply = Some(reply.encode());
            }
            Some(value) => {
                if let Some(control) = self.controls.get_mut(&packet.command) {
                    control.current = value.min(control.maximum);
                    debug!(
                        "sim: VCP 0x{:02X} set to {}",
                        packet.command, control.current
                    );
                }
            }
        }
    }
}

impl I2cChannel for SimDisplay {
    fn write_i2c(
        &mut self,
        chip_address: u8,
        data_address: u32,
        payload: &[u8],
    ) -> Result<(), TransportStatus> {
        self.transfers.push(Transfer::Write {
            chip: chip_address,
            data_address,
            payload: payload.to_vec(),
        });
        self.check(chip_address)?;

        if data_address == self.ddc_data_address {
            self.handle_ddc(payload);
        } else {
            self.memory.write(data_address, payload);
        }
        Ok(())
    }

    fn read_i2c(
        &mut self,
        chip_address: u8,
        offset: u32,
        buf: &mut [u8],
    ) -> Result<(), TransportStatus> {
        self.transfers.push(Transfer::Read {
            chip: chip_address,
            offset,
            len: buf.len(),
        });
        self.check(chip_address)?;

        match self.pending_reply.take() {
            Some(reply) if offset == 0 => {
                buf.fill(0);
                let n = buf.len().min(reply.len());
                buf[..n].copy_from_slice(&reply[..n]);
            }
            staged => {
                self.pending_reply = staged;
                self.memory.read(offset, buf);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddclink_protocol::vcp::VCP_CONTRAST;
    use ddclink_protocol::VCP_REPLY_TAG;

    fn write_packet(display: &mut SimDisplay, packet: DdcPacket) {
        let encoded = packet.encode_to_vec().unwrap();
        display
            .write_i2c(DDC_CHIP_ADDRESS, DDC_DATA_ADDRESS as u32, &encoded)
            .unwrap();
    }

    #[test]
    fn test_query_stages_reply() {
        let mut display = SimDisplay::new();
        write_packet(&mut display, DdcPacket::query(VCP_BRIGHTNESS));

        let mut buf = [0u8; VCP_REPLY_LEN];
        display.read_i2c(DDC_CHIP_ADDRESS, 0, &mut buf).unwrap();
        let reply = VcpReply::parse(&buf).unwrap();
        assert_eq!(reply.current, 50);
        assert_eq!(reply.maximum, 100);

        // Reply is consumed by the first read
        display.read_i2c(DDC_CHIP_ADDRESS, 0, &mut buf).unwrap();
        assert_ne!(buf[0], VCP_REPLY_TAG);
    }

    #[test]
    fn test_set_clamps_to_maximum() {
        let mut display = SimDisplay::new();
        write_packet(&mut display, DdcPacket::with_value(VCP_BRIGHTNESS, 500));
        assert_eq!(display.control_value(VCP_BRIGHTNESS), Some(100));
    }

    #[test]
    fn test_unknown_control_is_unsupported() {
        let mut display = SimDisplay::new();
        write_packet(&mut display, DdcPacket::query(VCP_CONTRAST));

        let mut buf = [0u8; VCP_REPLY_LEN];
        display.read_i2c(DDC_CHIP_ADDRESS, 0, &mut buf).unwrap();
        assert!(!VcpReply::parse(&buf).unwrap().is_supported());
    }

    #[test]
    fn test_malformed_packet_is_ignored() {
        let mut display = SimDisplay::new();
        display
            .write_i2c(DDC_CHIP_ADDRESS, DDC_DATA_ADDRESS as u32, &[1, 2, 3, 4, 5])
            .unwrap();
        assert_eq!(display.memory().written_len(), 0);
        assert_eq!(display.control_value(VCP_BRIGHTNESS), Some(50));
    }

    #[test]
    fn test_memory_echo() {
        let mut display = SimDisplay::new();
        display.write_i2c(DDC_CHIP_ADDRESS, 0x1000, &[9, 8, 7]).unwrap();

        let mut buf = [0u8; 3];
        display.read_i2c(DDC_CHIP_ADDRESS, 0x1000, &mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7]);
    }

    #[test]
    fn test_wrong_chip_nacks() {
        let mut display = SimDisplay::new();
        let result = display.write_i2c(0x50, 0x1000, &[1]);
        assert_eq!(result, Err(TransportStatus::NOT_RESPONDING));
        assert_eq!(display.transfer_count(), 1);
    }

    #[test]
    fn test_fault_injection() {
        let mut display = SimDisplay::new();
        display.fail_with(SimFault::Bus);

        let mut buf = [0u8; 1];
        assert_eq!(
            display.read_i2c(DDC_CHIP_ADDRESS, 0, &mut buf),
            Err(TransportStatus::ERROR)
        );

        display.clear_fault();
        assert!(display.read_i2c(DDC_CHIP_ADDRESS, 0, &mut buf).is_ok());
        assert_eq!(display.transfer_count(), 2);
    }
}
