//! Blank FLEX disk image builder
//!
//! Independent of the record codec. A FLEX volume is a grid of 256-byte
//! sectors addressed by (track, sector) with sectors numbered from 1.
//! Track 0 holds the boot sectors, the System Information Record (SIR)
//! at sector 3 and the directory chain from sector 5 onward; every other
//! sector joins the free chain. Each sector in a chain starts with a
//! two-byte link to the next sector, (0, 0) marking the end.

/// Bytes per sector, fixed by the on-disk format
pub const SECTOR_SIZE: usize = 256;

const DEFAULT_TRACKS: u32 = 77;
const DEFAULT_SECTORS: u32 = 15;
const MAX_VOLUME_NAME: usize = 11;

/// Error type for image geometry validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Track count outside 2..=256 (track numbers are stored in one byte)
    TrackCountOutOfRange { tracks: u32 },

    /// Sector count outside 5..=255 (track 0 needs sectors 1-5)
    SectorCountOutOfRange { sectors: u32 },

    /// Volume name longer than the 11-byte SIR field
    VolumeNameTooLong { len: usize },
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageError::TrackCountOutOfRange { tracks } => {
                write!(f, "Track count {} outside the supported range 2-256", tracks)
            }
            ImageError::SectorCountOutOfRange { sectors } => {
                write!(f, "Sector count {} outside the supported range 5-255", sectors)
            }
            ImageError::VolumeNameTooLong { len } => {
                write!(f, "Volume name of {} bytes exceeds the {}-byte SIR field", len, MAX_VOLUME_NAME)
            }
        }
    }
}

impl std::error::Error for ImageError {}

/// Builds a blank FLEX disk image
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    tracks: u32,
    sectors: u32,
    volume_name: String,
    volume_number: u16,
    init_date: (u8, u8, u8),
}

impl ImageBuilder {
    /// Create a builder with the classic 77-track, 15-sector geometry,
    /// an empty volume name and a zero initialisation date.
    pub fn new() -> Self {
        Self {
            tracks: DEFAULT_TRACKS,
            sectors: DEFAULT_SECTORS,
            volume_name: String::new(),
            volume_number: 0,
            init_date: (0, 0, 0),
        }
    }

    /// Set the number of tracks
    pub fn tracks(mut self, tracks: u32) -> Self {
        self.tracks = tracks;
        self
    }

    /// Set the number of sectors per track
    pub fn sectors(mut self, sectors: u32) -> Self {
        self.sectors = sectors;
        self
    }

    /// Set the volume name recorded in the SIR
    pub fn volume_name(mut self, name: impl Into<String>) -> Self {
        self.volume_name = name.into();
        self
    }

    /// Set the volume number recorded in the SIR
    pub fn volume_number(mut self, number: u16) -> Self {
        self.volume_number = number;
        self
    }

    /// Set the initialisation date as month, day, two-digit year
    pub fn init_date(mut self, month: u8, day: u8, year: u8) -> Self {
        self.init_date = (month, day, year % 100);
        self
    }

    /// Build the full image, sector by sector.
    pub fn build(&self) -> Result<Vec<u8>, ImageError> {
        if !(2..=256).contains(&self.tracks) {
            return Err(ImageError::TrackCountOutOfRange { tracks: self.tracks });
        }
        if !(5..=255).contains(&self.sectors) {
            return Err(ImageError::SectorCountOutOfRange { sectors: self.sectors });
        }
        if self.volume_name.len() > MAX_VOLUME_NAME {
            return Err(ImageError::VolumeNameTooLong { len: self.volume_name.len() });
        }

        let mut image = Vec::with_capacity(self.tracks as usize * self.sectors as usize * SECTOR_SIZE);
        for track in 0..self.tracks {
            for sector in 1..=self.sectors {
                image.extend_from_slice(&self.sector(track, sector));
            }
        }
        Ok(image)
    }

    /// Contents of one sector of the image.
    fn sector(&self, track: u32, sector: u32) -> [u8; SECTOR_SIZE] {
        let last_track = self.tracks - 1;
        if track == 0 && sector == 3 {
            // System Information Record
            self.sir()
        } else if track == 0 && sector >= 5 && sector < self.sectors {
            // Directory chain
            linked_sector(0, sector as u8 + 1)
        } else if track == 0 {
            // Boot sectors (1-2), reserved (4), end of directory chain
            linked_sector(0, 0)
        } else if track == last_track && sector == self.sectors {
            // End of free chain
            linked_sector(0, 0)
        } else if sector == self.sectors {
            // End of track: continue the free chain on the next track
            linked_sector(track as u8 + 1, 1)
        } else {
            // Free chain
            linked_sector(track as u8, sector as u8 + 1)
        }
    }

    /// The System Information Record at track 0, sector 3.
    fn sir(&self) -> [u8; SECTOR_SIZE] {
        let mut sector = [0u8; SECTOR_SIZE];
        let last_track = (self.tracks - 1) as u8;
        let last_sector = self.sectors as u8;
        let free_size = ((self.tracks - 1) * self.sectors) as u16;
        let (month, day, year) = self.init_date;

        // Volume name, padded with zeroes to 11 bytes, and volume number
        sector[16..16 + self.volume_name.len()].copy_from_slice(self.volume_name.as_bytes());
        sector[27..29].copy_from_slice(&self.volume_number.to_be_bytes());

        // Free chain: start, end, size in sectors
        sector[29] = 1;
        sector[30] = 1;
        sector[31] = last_track;
        sector[32] = last_sector;
        sector[33..35].copy_from_slice(&free_size.to_be_bytes());

        // Initialisation date (mm/dd/yy) and maximum track/sector numbers
        sector[35] = month;
        sector[36] = day;
        sector[37] = year;
        sector[38] = last_track;
        sector[39] = last_sector;

        // Remaining 216 bytes are reserved and stay zero
        sector
    }
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A blank sector holding only a link to the next sector in its chain.
/// A (0, 0) link marks the end of a chain, so this also produces the
/// all-zero boot and reserved sectors.
fn linked_sector(track: u8, sector: u8) -> [u8; SECTOR_SIZE] {
    let mut bytes = [0u8; SECTOR_SIZE];
    bytes[0] = track;
    bytes[1] = sector;
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector_of(image: &[u8], sectors: u32, track: u32, sector: u32) -> &[u8] {
        let index = (track * sectors + sector - 1) as usize * SECTOR_SIZE;
        &image[index..index + SECTOR_SIZE]
    }

    #[test]
    fn test_default_geometry_size() {
        let image = ImageBuilder::new().build().unwrap();
        assert_eq!(image.len(), 77 * 15 * SECTOR_SIZE);
    }

    #[test]
    fn test_boot_and_reserved_sectors_are_zero() {
        let image = ImageBuilder::new().build().unwrap();
        for sector in [1, 2, 4] {
            assert!(sector_of(&image, 15, 0, sector).iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_sir_fields() {
        let image = ImageBuilder::new()
            .volume_name("SYSTEM")
            .volume_number(42)
            .init_date(7, 26, 15)
            .build()
            .unwrap();
        let sir = sector_of(&image, 15, 0, 3);

        assert!(sir[..16].iter().all(|&b| b == 0));
        assert_eq!(&sir[16..27], b"SYSTEM\0\0\0\0\0");
        assert_eq!(&sir[27..29], &42u16.to_be_bytes());
        // Free chain runs from (1, 1) to (76, 15), 76 * 15 sectors
        assert_eq!(&sir[29..33], &[1, 1, 76, 15]);
        assert_eq!(&sir[33..35], &(76u16 * 15).to_be_bytes());
        assert_eq!(&sir[35..38], &[7, 26, 15]);
        assert_eq!(&sir[38..40], &[76, 15]);
        assert!(sir[40..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_directory_chain_links() {
        let image = ImageBuilder::new().build().unwrap();
        // Sectors 5..14 of track 0 each link to the next; 15 ends the chain
        for sector in 5..15 {
            assert_eq!(&sector_of(&image, 15, 0, sector)[..2], &[0, sector as u8 + 1]);
        }
        assert_eq!(&sector_of(&image, 15, 0, 15)[..2], &[0, 0]);
    }

    #[test]
    fn test_free_chain_links() {
        let image = ImageBuilder::new().build().unwrap();
        // Within a track
        assert_eq!(&sector_of(&image, 15, 1, 1)[..2], &[1, 2]);
        // Across a track boundary
        assert_eq!(&sector_of(&image, 15, 1, 15)[..2], &[2, 1]);
        // End of the free chain on the last track
        assert_eq!(&sector_of(&image, 15, 76, 15)[..2], &[0, 0]);
    }

    #[test]
    fn test_geometry_validation() {
        assert_eq!(
            ImageBuilder::new().tracks(1).build().unwrap_err(),
            ImageError::TrackCountOutOfRange { tracks: 1 }
        );
        assert_eq!(
            ImageBuilder::new().sectors(4).build().unwrap_err(),
            ImageError::SectorCountOutOfRange { sectors: 4 }
        );
        assert_eq!(
            ImageBuilder::new().volume_name("TWELVECHARSX").build().unwrap_err(),
            ImageError::VolumeNameTooLong { len: 12 }
        );
    }

    #[test]
    fn test_small_geometry() {
        let image = ImageBuilder::new().tracks(2).sectors(5).build().unwrap();
        assert_eq!(image.len(), 2 * 5 * SECTOR_SIZE);
        // Track 0 sector 5 is the whole (empty) directory chain
        assert_eq!(&sector_of(&image, 5, 0, 5)[..2], &[0, 0]);
        // Track 1 holds the whole free chain
        assert_eq!(&sector_of(&image, 5, 1, 1)[..2], &[1, 2]);
        assert_eq!(&sector_of(&image, 5, 1, 5)[..2], &[0, 0]);
    }
}
