#![allow(dead_code)]

pub const TYPE_A: u16 = 1;
pub const TYPE_CNAME: u16 = 5;

const QUESTION_OFFSET: usize = 12;

pub fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// Builds synthetic replies to a single-question query.
///
/// With compression on, answer owners point at the question name and RDATA
/// names reuse the longest label suffix they share with it.
#[derive(Debug, Clone)]
pub struct ReplyBuilder {
    id: u16,
    flags: u16,
    qname: String,
    qtype: u16,
    answers: Vec<(u16, String)>,
    compress: bool,
}

impl ReplyBuilder {
    pub fn new(qname: &str) -> Self {
        Self {
            id: 0x1234,
            flags: 0x8180,
            qname: qname.to_string(),
            qtype: TYPE_CNAME,
            answers: Vec::new(),
            compress: false,
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn qtype(mut self, qtype: u16) -> Self {
        self.qtype = qtype;
        self
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.flags = (self.flags & !0x000F) | u16::from(rcode & 0x0F);
        self
    }

    pub fn truncated(mut self) -> Self {
        self.flags |= 0x0200;
        self
    }

    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }

    pub fn cname(self, target: &str) -> Self {
        self.answer(TYPE_CNAME, target)
    }

    /// An answer whose RDATA is a name, whatever `rtype` says.
    pub fn answer(mut self, rtype: u16, target: &str) -> Self {
        self.answers.push((rtype, target.to_string()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut msg = Vec::with_capacity(512);
        msg.extend_from_slice(&self.id.to_be_bytes());
        msg.extend_from_slice(&self.flags.to_be_bytes());
        msg.extend_from_slice(&1u16.to_be_bytes());
        msg.extend_from_slice(&(self.answers.len() as u16).to_be_bytes());
        msg.extend_from_slice(&[0, 0, 0, 0]);

        msg.extend_from_slice(&encode_name(&self.qname));
        msg.extend_from_slice(&self.qtype.to_be_bytes());
        msg.extend_from_slice(&1u16.to_be_bytes());

        for (rtype, target) in &self.answers {
            if self.compress {
                msg.extend_from_slice(&pointer(QUESTION_OFFSET));
            } else {
                msg.extend_from_slice(&encode_name(&self.qname));
            }
            let rdata = if self.compress {
                self.compressed_name(target)
            } else {
                encode_name(target)
            };
            msg.extend_from_slice(&rtype.to_be_bytes());
            msg.extend_from_slice(&1u16.to_be_bytes());
            msg.extend_from_slice(&3600u32.to_be_bytes());
            msg.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            msg.extend_from_slice(&rdata);
        }

        msg
    }

    fn compressed_name(&self, target: &str) -> Vec<u8> {
        let qlabels: Vec<&str> = self.qname.trim_end_matches('.').split('.').collect();
        let tlabels: Vec<&str> = target.trim_end_matches('.').split('.').collect();

        let shared = qlabels
            .iter()
            .rev()
            .zip(tlabels.iter().rev())
            .take_while(|(q, t)| q.eq_ignore_ascii_case(t))
            .count();
        if shared == 0 {
            return encode_name(target);
        }

        let suffix_offset = QUESTION_OFFSET
            + qlabels[..qlabels.len() - shared]
                .iter()
                .map(|l| l.len() + 1)
                .sum::<usize>();

        let mut out = Vec::new();
        for label in &tlabels[..tlabels.len() - shared] {
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        out.extend_from_slice(&pointer(suffix_offset));
        out
    }
}

fn pointer(offset: usize) -> [u8; 2] {
    [0xC0 | (offset >> 8) as u8, offset as u8]
}
