//! Builder for synthetic DLL images used in tests

use super::layout::{NO_OFFSET, header, reloc};

#[derive(Debug, Clone)]
pub struct DllBuilder {
    text: Vec<u8>,
    got: Vec<u32>,
    gp_relocs: Vec<u32>,
    data_relocs: Vec<u32>,
    rodata: Vec<u8>,
    data: Vec<u8>,
    exports: Vec<u32>,
    ctor: u32,
    dtor: u32,
}

impl Default for DllBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DllBuilder {
    pub fn new() -> Self {
        Self {
            text: Vec::new(),
            got: Vec::new(),
            gp_relocs: Vec::new(),
            data_relocs: Vec::new(),
            rodata: Vec::new(),
            data: Vec::new(),
            exports: Vec::new(),
            ctor: NO_OFFSET,
            dtor: NO_OFFSET,
        }
    }

    pub fn text(mut self, bytes: &[u8]) -> Self {
        self.text = bytes.to_vec();
        self
    }

    pub fn got(mut self, entries: &[u32]) -> Self {
        self.got = entries.to_vec();
        self
    }

    pub fn gp_relocs(mut self, entries: &[u32]) -> Self {
        self.gp_relocs = entries.to_vec();
        self
    }

    pub fn data_relocs(mut self, entries: &[u32]) -> Self {
        self.data_relocs = entries.to_vec();
        self
    }

    pub fn rodata(mut self, bytes: &[u8]) -> Self {
        self.rodata = bytes.to_vec();
        self
    }

    pub fn data(mut self, bytes: &[u8]) -> Self {
        self.data = bytes.to_vec();
        self
    }

    pub fn exports(mut self, offsets: &[u32]) -> Self {
        self.exports = offsets.to_vec();
        self
    }

    pub fn ctor(mut self, offset: u32) -> Self {
        self.ctor = offset;
        self
    }

    pub fn dtor(mut self, offset: u32) -> Self {
        self.dtor = offset;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let header_size = header::EXPORTS + self.exports.len() * header::WORD;
        let rodata_offset = header_size + self.text.len();
        let reloc_words = self.got.len() + self.gp_relocs.len() + self.data_relocs.len() + 3;
        let data_offset = rodata_offset + reloc_words * header::WORD + self.rodata.len();

        let mut out = Vec::with_capacity(data_offset + self.data.len());
        push_word(&mut out, header_size as u32);
        push_word(&mut out, data_offset as u32);
        push_word(&mut out, rodata_offset as u32);
        out.extend_from_slice(&(self.exports.len() as u16).to_be_bytes());
        out.extend_from_slice(&[0, 0]);
        push_word(&mut out, self.ctor);
        push_word(&mut out, self.dtor);
        for &export in &self.exports {
            push_word(&mut out, export);
        }

        out.extend_from_slice(&self.text);

        for (run, terminator) in [
            (&self.got, reloc::GOT_END),
            (&self.gp_relocs, reloc::GP_END),
            (&self.data_relocs, reloc::DATA_END),
        ] {
            for &entry in run {
                push_word(&mut out, entry);
            }
            push_word(&mut out, terminator);
        }

        out.extend_from_slice(&self.rodata);
        out.extend_from_slice(&self.data);
        out
    }
}

fn push_word(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
