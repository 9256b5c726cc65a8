use crc::{Algorithm, Crc};

/// CRC-8 used by the SHT2x family: x^8 + x^5 + x^4 + 1, seed 0, MSB first.
pub const CRC_8_SHT2X: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0x00,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xA2,
    residue: 0x00,
};

const CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_SHT2X);

/// Compute the checksum the sensor appends to `data`
pub fn crc8(data: &[u8]) -> u8 {
    CRC.checksum(data)
}

/// Returns `true` when `checksum` matches the checksum computed over `data`
pub fn check_crc(data: &[u8], checksum: u8) -> bool {
    crc8(data) == checksum
}
