/*Interfaz del fsck con la imagen.
El fsck sólo necesita leer y escribir regiones completas en offsets absolutos.
Hay dos implementaciones: FileBackend (archivo real, o cualquier Read+Write+Seek)
y MemBackend (en memoria, ver mock.rs) para pruebas.
Una lectura o escritura parcial es un error: no se toleran imágenes truncadas. */

use std::io::{self, Read, Seek, SeekFrom, Write};

pub trait FsckBackend {
    /// Lee exactamente `buf.len()` bytes desde `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()>;
    /// Escribe `data` completo en `offset`.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

#[derive(Debug)]
pub struct FileBackend<T: Read + Write + Seek> {
    io: T,
}

impl<T: Read + Write + Seek> FileBackend<T> {
    pub fn new(io: T) -> Self {
        Self { io }
    }
}

impl<T: Read + Write + Seek> FsckBackend for FileBackend<T> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.read_exact(buf)
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()> {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.write_all(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.io.flush()
    }
}
