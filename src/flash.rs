//! EEPROM image kept in the nRF52840's internal flash.
//!
//! The whole 8-byte image is one item of a `sequential-storage` map, so a
//! commit rewrites both slots at once and the crate handles page rotation
//! and wear levelling.
//!
//! Storage layout:
//!   - key `0x01` → the raw image (see `light_timer::storage`)
//!   - nothing stored yet → the image stays erased (all `0xFF`)

use defmt::{debug, error, info};
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use light_timer::config::{
    EEPROM_SIZE, FLASH_PAGE_SIZE, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START,
};
use light_timer::storage::{save_time, EepromImage, TimeSlot};
use light_timer::{Error, Result, Time};

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key of the image in the map storage.
const KEY_EEPROM_IMAGE: u8 = 0x01;

/// Scratch buffer for one map item (key, length header and image).
const ITEM_BUF_SIZE: usize = 32;

/// In-memory image, synced with flash.
pub struct FlashEeprom {
    image: EepromImage,
}

impl FlashEeprom {
    pub const fn new() -> Self {
        Self {
            image: EepromImage::erased(),
        }
    }

    pub fn image(&self) -> &EepromImage {
        &self.image
    }

    /// Async load from flash; a missing or unreadable item leaves the
    /// image erased.
    pub async fn load(&mut self, flash: &mut impl NorFlash) {
        let mut buf = [0u8; ITEM_BUF_SIZE];

        match fetch_item::<u8, &[u8], _>(
            flash,
            STORAGE_START..STORAGE_END,
            &mut NoCache::new(),
            &mut buf,
            &KEY_EEPROM_IMAGE,
        )
        .await
        {
            Ok(Some(data)) => {
                self.image = EepromImage::from_bytes(data);
                info!("Loaded EEPROM image from flash");
            }
            Ok(None) => {
                info!("No EEPROM image in flash");
                self.image = EepromImage::erased();
            }
            Err(e) => {
                error!("Flash read error: {:?}", defmt::Debug2Format(&e));
                self.image = EepromImage::erased();
            }
        }
    }

    /// Write `time` into `slot` and persist the image.
    pub async fn persist(
        &mut self,
        flash: &mut impl NorFlash,
        slot: TimeSlot,
        time: Time,
    ) -> Result<()> {
        save_time(&mut self.image, time, slot)?;
        self.save(flash).await
    }

    async fn save(&mut self, flash: &mut impl NorFlash) -> Result<()> {
        if !self.image.is_dirty() {
            debug!("Flash: no changes to save");
            return Ok(());
        }

        let mut buf = [0u8; ITEM_BUF_SIZE];
        let mut data = [0u8; EEPROM_SIZE];
        data.copy_from_slice(self.image.as_bytes());
        let item: &[u8] = &data;

        match store_item::<u8, &[u8], _>(
            flash,
            STORAGE_START..STORAGE_END,
            &mut NoCache::new(),
            &mut buf,
            &KEY_EEPROM_IMAGE,
            &item,
        )
        .await
        {
            Ok(()) => {
                info!("Saved EEPROM image to flash");
                self.image.mark_clean();
                Ok(())
            }
            Err(e) => {
                error!("Flash write error: {:?}", defmt::Debug2Format(&e));
                Err(Error::Storage)
            }
        }
    }
}
