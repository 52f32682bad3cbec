// src/common/hash.rs

//! 13-bit hashes of AT command mnemonics.
//!
//! Data lines (`+CSQ: 23,99`) are dispatched on the hash of the text between
//! `+` and `:`, and a pending command records the hash of the data line it
//! expects. The hash is
//!
//! ```text
//! hash = ((hash + c) * c) % 0x1FFF
//! ```
//!
//! evaluated in 16-bit wrapping arithmetic from a seed of zero. The constants
//! below were generated with exactly that arithmetic; the table test checks
//! them against [`CommandHash::of`].

use core::fmt;

const HASH_MODULUS: u16 = 0x1FFF;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandHash(u16);

impl CommandHash {
    /// "No data line expected": the command completes on `OK` alone.
    pub const NONE: CommandHash = CommandHash(0);

    /// Folds one more mnemonic byte into a running hash.
    #[inline]
    pub const fn step(self, c: u8) -> CommandHash {
        let c = c as u16;
        CommandHash(self.0.wrapping_add(c).wrapping_mul(c) % HASH_MODULUS)
    }

    /// Hashes a complete mnemonic.
    pub const fn of(mnemonic: &[u8]) -> CommandHash {
        let mut hash = CommandHash::NONE;
        let mut i = 0;
        while i < mnemonic.len() {
            hash = hash.step(mnemonic[i]);
            i += 1;
        }
        hash
    }

    #[inline]
    pub const fn value(&self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Reverse lookup for diagnostics.
    pub fn mnemonic(&self) -> Option<&'static str> {
        KNOWN_COMMANDS
            .iter()
            .find(|(_, hash)| hash == self)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for CommandHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

// --- Known mnemonics ---

impl CommandHash {
    pub const CFUN: CommandHash = CommandHash(5504);
    pub const ATE0: CommandHash = CommandHash(4135);
    pub const CADC: CommandHash = CommandHash(2084);
    pub const CBAND: CommandHash = CommandHash(7975);
    pub const CBATCHK: CommandHash = CommandHash(1038);
    pub const CBC: CommandHash = CommandHash(2846);
    pub const CCID: CommandHash = CommandHash(3685);
    pub const CCLK: CommandHash = CommandHash(5436);
    pub const CDEVICE: CommandHash = CommandHash(3423);
    pub const CDNSCFG: CommandHash = CommandHash(3183);
    pub const CDNSGIP: CommandHash = CommandHash(3187);
    pub const CEDRX: CommandHash = CommandHash(5950);
    pub const CFGRI: CommandHash = CommandHash(834);
    pub const CGACT: CommandHash = CommandHash(7916);
    pub const CGATT: CommandHash = CommandHash(4471);
    pub const CGDCONT: CommandHash = CommandHash(1998);
    pub const CGMI: CommandHash = CommandHash(4522);
    pub const CGMM: CommandHash = CommandHash(3278);
    pub const CGMR: CommandHash = CommandHash(1778);
    pub const CGPADDR: CommandHash = CommandHash(4309);
    pub const CGPIO: CommandHash = CommandHash(2529);
    pub const CGREG: CommandHash = CommandHash(6103);
    pub const CGSMS: CommandHash = CommandHash(6440);
    pub const CGSN: CommandHash = CommandHash(8167);
    pub const CIFSR: CommandHash = CommandHash(5393);
    pub const CIFSREX: CommandHash = CommandHash(4129);
    pub const CIICR: CommandHash = CommandHash(7427);
    pub const CIMI: CommandHash = CommandHash(5733);
    pub const CIPACK: CommandHash = CommandHash(2527);
    pub const CIPATS: CommandHash = CommandHash(5867);
    pub const CIPCCFG: CommandHash = CommandHash(1332);
    pub const CIPCLOSE: CommandHash = CommandHash(4441);
    pub const CIPCSGP: CommandHash = CommandHash(6788);
    pub const CIPDPDP: CommandHash = CommandHash(2803);
    pub const CIPHEAD: CommandHash = CommandHash(6735);
    pub const CIPHEXS: CommandHash = CommandHash(2231);
    pub const CIPMODE: CommandHash = CommandHash(3925);
    pub const CIPMUX: CommandHash = CommandHash(4971);
    pub const CIPQSEND: CommandHash = CommandHash(7247);
    pub const CIPRDTIMER: CommandHash = CommandHash(6050);
    pub const CIPRXGET: CommandHash = CommandHash(45);
    pub const CIPSEND: CommandHash = CommandHash(3535);
    pub const CIPSENDHEX: CommandHash = CommandHash(6008);
    pub const CIPSERVER: CommandHash = CommandHash(1321);
    pub const CIPSGTXT: CommandHash = CommandHash(6224);
    pub const CIPSHOWTP: CommandHash = CommandHash(6256);
    pub const CIPSHUT: CommandHash = CommandHash(2543);
    pub const CIPSPRT: CommandHash = CommandHash(243);
    pub const CIPSRIP: CommandHash = CommandHash(8017);
    pub const CIPSTART: CommandHash = CommandHash(5321);
    pub const CIPSTATUS: CommandHash = CommandHash(146);
    pub const CIPUDPMODE: CommandHash = CommandHash(5520);
    pub const CLCK: CommandHash = CommandHash(1313);
    pub const CLPORT: CommandHash = CommandHash(7825);
    pub const CLTS: CommandHash = CommandHash(6426);
    pub const CME_ERROR: CommandHash = CommandHash(4920);
    pub const CMEE: CommandHash = CommandHash(1561);
    pub const CMGD: CommandHash = CommandHash(3038);
    pub const CMGF: CommandHash = CommandHash(8087);
    pub const CMGL: CommandHash = CommandHash(6892);
    pub const CMGR: CommandHash = CommandHash(5769);
    pub const CMGS: CommandHash = CommandHash(4225);
    pub const CMGW: CommandHash = CommandHash(6260);
    pub const CMNB: CommandHash = CommandHash(2067);
    pub const CMS_ERROR: CommandHash = CommandHash(4701);
    pub const CMSS: CommandHash = CommandHash(4726);
    pub const CMTI: CommandHash = CommandHash(4565);
    pub const CNBP: CommandHash = CommandHash(356);
    pub const CNETLIGHT: CommandHash = CommandHash(536);
    pub const CNMI: CommandHash = CommandHash(5254);
    pub const CNMP: CommandHash = CommandHash(2054);
    pub const CNSMOD: CommandHash = CommandHash(7913);
    pub const CNVR: CommandHash = CommandHash(8110);
    pub const CNVW: CommandHash = CommandHash(1251);
    pub const COPN: CommandHash = CommandHash(6015);
    pub const COPS: CommandHash = CommandHash(5237);
    pub const CPAS: CommandHash = CommandHash(4474);
    pub const CPIN: CommandHash = CommandHash(5717);
    pub const CPMS: CommandHash = CommandHash(7876);
    pub const CPOL: CommandHash = CommandHash(7102);
    pub const CPOWD: CommandHash = CommandHash(3771);
    pub const CPSMS: CommandHash = CommandHash(4585);
    pub const CPWD: CommandHash = CommandHash(1373);
    pub const CRC: CommandHash = CommandHash(1229);
    pub const CREG: CommandHash = CommandHash(7198);
    pub const CRES: CommandHash = CommandHash(3527);
    pub const CRSM: CommandHash = CommandHash(2775);
    pub const CSAS: CommandHash = CommandHash(7438);
    pub const CSCA: CommandHash = CommandHash(7908);
    pub const CSCLK: CommandHash = CommandHash(5165);
    pub const CSCS: CommandHash = CommandHash(2387);
    pub const CSDH: CommandHash = CommandHash(945);
    pub const CSGS: CommandHash = CommandHash(2388);
    pub const CSIM: CommandHash = CommandHash(1069);
    pub const CSMP: CommandHash = CommandHash(3011);
    pub const CSMS: CommandHash = CommandHash(2658);
    pub const CSQ: CommandHash = CommandHash(30);
    pub const CSTT: CommandHash = CommandHash(6339);
    pub const CUSD: CommandHash = CommandHash(2225);
    pub const GCAP: CommandHash = CommandHash(2898);
    pub const GMI: CommandHash = CommandHash(3303);
    pub const GMM: CommandHash = CommandHash(7383);
    pub const GMR: CommandHash = CommandHash(4337);
    pub const GOI: CommandHash = CommandHash(286);
    pub const GSN: CommandHash = CommandHash(1494);
    pub const GSV: CommandHash = CommandHash(5493);
    pub const HTTPACTION: CommandHash = CommandHash(6704);
    pub const HTTPDATA: CommandHash = CommandHash(1570);
    pub const HTTPHEAD: CommandHash = CommandHash(3434);
    pub const HTTPINIT: CommandHash = CommandHash(4499);
    pub const HTTPPARA: CommandHash = CommandHash(7338);
    pub const HTTPREAD: CommandHash = CommandHash(5780);
    pub const HTTPSTATUS: CommandHash = CommandHash(2153);
    pub const HTTPTERM: CommandHash = CommandHash(5498);
    pub const HTTPTOFS: CommandHash = CommandHash(7109);
    pub const ICF: CommandHash = CommandHash(7333);
    pub const IFC: CommandHash = CommandHash(4730);
    pub const IPR: CommandHash = CommandHash(2352);
    pub const SGPIO: CommandHash = CommandHash(6640);
    pub const SLED: CommandHash = CommandHash(5425);
}

/// Every mnemonic with a precomputed hash.
pub const KNOWN_COMMANDS: &[(&str, CommandHash)] = &[
    ("CFUN", CommandHash::CFUN),
    ("ATE0", CommandHash::ATE0),
    ("CADC", CommandHash::CADC),
    ("CBAND", CommandHash::CBAND),
    ("CBATCHK", CommandHash::CBATCHK),
    ("CBC", CommandHash::CBC),
    ("CCID", CommandHash::CCID),
    ("CCLK", CommandHash::CCLK),
    ("CDEVICE", CommandHash::CDEVICE),
    ("CDNSCFG", CommandHash::CDNSCFG),
    ("CDNSGIP", CommandHash::CDNSGIP),
    ("CEDRX", CommandHash::CEDRX),
    ("CFGRI", CommandHash::CFGRI),
    ("CGACT", CommandHash::CGACT),
    ("CGATT", CommandHash::CGATT),
    ("CGDCONT", CommandHash::CGDCONT),
    ("CGMI", CommandHash::CGMI),
    ("CGMM", CommandHash::CGMM),
    ("CGMR", CommandHash::CGMR),
    ("CGPADDR", CommandHash::CGPADDR),
    ("CGPIO", CommandHash::CGPIO),
    ("CGREG", CommandHash::CGREG),
    ("CGSMS", CommandHash::CGSMS),
    ("CGSN", CommandHash::CGSN),
    ("CIFSR", CommandHash::CIFSR),
    ("CIFSREX", CommandHash::CIFSREX),
    ("CIICR", CommandHash::CIICR),
    ("CIMI", CommandHash::CIMI),
    ("CIPACK", CommandHash::CIPACK),
    ("CIPATS", CommandHash::CIPATS),
    ("CIPCCFG", CommandHash::CIPCCFG),
    ("CIPCLOSE", CommandHash::CIPCLOSE),
    ("CIPCSGP", CommandHash::CIPCSGP),
    ("CIPDPDP", CommandHash::CIPDPDP),
    ("CIPHEAD", CommandHash::CIPHEAD),
    ("CIPHEXS", CommandHash::CIPHEXS),
    ("CIPMODE", CommandHash::CIPMODE),
    ("CIPMUX", CommandHash::CIPMUX),
    ("CIPQSEND", CommandHash::CIPQSEND),
    ("CIPRDTIMER", CommandHash::CIPRDTIMER),
    ("CIPRXGET", CommandHash::CIPRXGET),
    ("CIPSEND", CommandHash::CIPSEND),
    ("CIPSENDHEX", CommandHash::CIPSENDHEX),
    ("CIPSERVER", CommandHash::CIPSERVER),
    ("CIPSGTXT", CommandHash::CIPSGTXT),
    ("CIPSHOWTP", CommandHash::CIPSHOWTP),
    ("CIPSHUT", CommandHash::CIPSHUT),
    ("CIPSPRT", CommandHash::CIPSPRT),
    ("CIPSRIP", CommandHash::CIPSRIP),
    ("CIPSTART", CommandHash::CIPSTART),
    ("CIPSTATUS", CommandHash::CIPSTATUS),
    ("CIPUDPMODE", CommandHash::CIPUDPMODE),
    ("CLCK", CommandHash::CLCK),
    ("CLPORT", CommandHash::CLPORT),
    ("CLTS", CommandHash::CLTS),
    ("CME ERROR", CommandHash::CME_ERROR),
    ("CMEE", CommandHash::CMEE),
    ("CMGD", CommandHash::CMGD),
    ("CMGF", CommandHash::CMGF),
    ("CMGL", CommandHash::CMGL),
    ("CMGR", CommandHash::CMGR),
    ("CMGS", CommandHash::CMGS),
    ("CMGW", CommandHash::CMGW),
    ("CMNB", CommandHash::CMNB),
    ("CMS ERROR", CommandHash::CMS_ERROR),
    ("CMSS", CommandHash::CMSS),
    ("CMTI", CommandHash::CMTI),
    ("CNBP", CommandHash::CNBP),
    ("CNETLIGHT", CommandHash::CNETLIGHT),
    ("CNMI", CommandHash::CNMI),
    ("CNMP", CommandHash::CNMP),
    ("CNSMOD", CommandHash::CNSMOD),
    ("CNVR", CommandHash::CNVR),
    ("CNVW", CommandHash::CNVW),
    ("COPN", CommandHash::COPN),
    ("COPS", CommandHash::COPS),
    ("CPAS", CommandHash::CPAS),
    ("CPIN", CommandHash::CPIN),
    ("CPMS", CommandHash::CPMS),
    ("CPOL", CommandHash::CPOL),
    ("CPOWD", CommandHash::CPOWD),
    ("CPSMS", CommandHash::CPSMS),
    ("CPWD", CommandHash::CPWD),
    ("CRC", CommandHash::CRC),
    ("CREG", CommandHash::CREG),
    ("CRES", CommandHash::CRES),
    ("CRSM", CommandHash::CRSM),
    ("CSAS", CommandHash::CSAS),
    ("CSCA", CommandHash::CSCA),
    ("CSCLK", CommandHash::CSCLK),
    ("CSCS", CommandHash::CSCS),
    ("CSDH", CommandHash::CSDH),
    ("CSGS", CommandHash::CSGS),
    ("CSIM", CommandHash::CSIM),
    ("CSMP", CommandHash::CSMP),
    ("CSMS", CommandHash::CSMS),
    ("CSQ", CommandHash::CSQ),
    ("CSTT", CommandHash::CSTT),
    ("CUSD", CommandHash::CUSD),
    ("GCAP", CommandHash::GCAP),
    ("GMI", CommandHash::GMI),
    ("GMM", CommandHash::GMM),
    ("GMR", CommandHash::GMR),
    ("GOI", CommandHash::GOI),
    ("GSN", CommandHash::GSN),
    ("GSV", CommandHash::GSV),
    ("HTTPACTION", CommandHash::HTTPACTION),
    ("HTTPDATA", CommandHash::HTTPDATA),
    ("HTTPHEAD", CommandHash::HTTPHEAD),
    ("HTTPINIT", CommandHash::HTTPINIT),
    ("HTTPPARA", CommandHash::HTTPPARA),
    ("HTTPREAD", CommandHash::HTTPREAD),
    ("HTTPSTATUS", CommandHash::HTTPSTATUS),
    ("HTTPTERM", CommandHash::HTTPTERM),
    ("HTTPTOFS", CommandHash::HTTPTOFS),
    ("ICF", CommandHash::ICF),
    ("IFC", CommandHash::IFC),
    ("IPR", CommandHash::IPR),
    ("SGPIO", CommandHash::SGPIO),
    ("SLED", CommandHash::SLED),
];
