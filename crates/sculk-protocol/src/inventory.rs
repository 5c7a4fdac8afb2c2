use crate::packet::{Packet, PacketBuffer, SlotData};
use sculk_common::Result;

/// Set Held Item (serverbound): the active hotbar slot, 0 through 8.
#[derive(Debug, Clone, Copy)]
pub struct SetHeldItemPacket {
    pub slot: i16,
}

impl Packet for SetHeldItemPacket {
    fn packet_id() -> i32 {
        0x25
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(SetHeldItemPacket {
            slot: buffer.read_i16()?,
        })
    }
}

/// Set Creative Mode Slot (serverbound): a creative client writing an
/// item stack straight into its inventory. Slots 36..=44 are the hotbar.
#[derive(Debug, Clone, Copy)]
pub struct SetCreativeModeSlotPacket {
    pub slot: i16,
    pub clicked_item: Option<SlotData>,
}

impl SetCreativeModeSlotPacket {
    /// Hotbar index of an inventory slot, when it is one.
    pub fn hotbar_index(&self) -> Option<usize> {
        if (36..=44).contains(&self.slot) {
            Some((self.slot - 36) as usize)
        } else {
            None
        }
    }
}

impl Packet for SetCreativeModeSlotPacket {
    fn packet_id() -> i32 {
        0x28
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(SetCreativeModeSlotPacket {
            slot: buffer.read_i16()?,
            clicked_item: buffer.read_slot()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotbar_slots_map_to_indexes() {
        let packet = SetCreativeModeSlotPacket {
            slot: 36,
            clicked_item: None,
        };
        assert_eq!(packet.hotbar_index(), Some(0));

        let packet = SetCreativeModeSlotPacket {
            slot: 44,
            clicked_item: None,
        };
        assert_eq!(packet.hotbar_index(), Some(8));

        let packet = SetCreativeModeSlotPacket {
            slot: 10,
            clicked_item: None,
        };
        assert_eq!(packet.hotbar_index(), None);
    }
}
