use std::fmt;

/// Proxy-configuration URI schemes the matcher recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scheme {
    Shadowsocks,
    Vmess,
    Trojan,
    Vless,
}

impl Scheme {
    pub const ALL: [Scheme; 4] = [
        Scheme::Shadowsocks,
        Scheme::Vmess,
        Scheme::Trojan,
        Scheme::Vless,
    ];

    /// Short name, also used as the output file stem.
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Shadowsocks => "ss",
            Scheme::Vmess => "vmess",
            Scheme::Trojan => "trojan",
            Scheme::Vless => "vless",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Shadowsocks => "ss://",
            Scheme::Vmess => "vmess://",
            Scheme::Trojan => "trojan://",
            Scheme::Vless => "vless://",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output buffer a rewritten configuration is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Scheme(Scheme),
    /// Every scheme together, each entry tagged with a run-scoped sequence number.
    Mixed,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Scheme(Scheme::Shadowsocks),
        Bucket::Scheme(Scheme::Vmess),
        Bucket::Scheme(Scheme::Trojan),
        Bucket::Scheme(Scheme::Vless),
        Bucket::Mixed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Bucket::Scheme(scheme) => scheme.name(),
            Bucket::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
