// Bitmaps de VSFS: 1 bit por recurso, LSB primero dentro de cada byte.
// 1 = usado, 0 = libre.

#[inline]
pub fn is_bit_set(bitmap: &[u8], index: usize) -> bool {
    let byte = index / 8;
    let bit = index % 8;
    (bitmap[byte] >> bit) & 1 == 1
}

#[inline]
pub fn set_bit(bitmap: &mut [u8], index: usize) {
    let byte = index / 8;
    let bit = index % 8;
    bitmap[byte] |= 1 << bit;
}

#[inline]
pub fn clear_bit(bitmap: &mut [u8], index: usize) {
    let byte = index / 8;
    let bit = index % 8;
    bitmap[byte] &= !(1 << bit);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_and_clear_single_bit() {
        let mut bm = [0u8; 4];
        set_bit(&mut bm, 9);
        assert_eq!(bm, [0, 0b0000_0010, 0, 0]);
        assert!(is_bit_set(&bm, 9));
        assert!(!is_bit_set(&bm, 8));

        clear_bit(&mut bm, 9);
        assert_eq!(bm, [0; 4]);
    }

    #[test]
    fn neighbours_are_untouched() {
        let mut bm = [0xFFu8; 2];
        clear_bit(&mut bm, 7);
        assert_eq!(bm, [0x7F, 0xFF]);
        assert!(is_bit_set(&bm, 6));
        assert!(is_bit_set(&bm, 8));

        set_bit(&mut bm, 7);
        assert_eq!(bm, [0xFF, 0xFF]);
    }
}
