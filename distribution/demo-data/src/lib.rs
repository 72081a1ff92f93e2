//! Fixture verses for tests and benchmarks.
//!
//! `VERSES` holds a few well-known ślokas with their attribution, in the shape
//! of the corpus spreadsheet. `DEMO_CSV` is the same data exported as CSV, and
//! `filler_verses` produces any number of deterministic verses that share no
//! letters with `OPENING_HALF_VERSE`, so a search for it never matches filler.

use once_cell::sync::Lazy;

pub const HEADERS: [&str; 6] = [
    "IAST Verse",
    "Original Source",
    "Author",
    "Context",
    "English Translation",
    "Cited In",
];

#[derive(Debug, Clone, Copy)]
pub struct DemoVerse {
    pub iast_verse: &'static str,
    pub original_source: &'static str,
    pub author: &'static str,
    pub context: &'static str,
    pub translation: &'static str,
    pub cited_in: &'static str,
}

impl DemoVerse {
    pub fn fields(&self) -> [&'static str; 6] {
        [
            self.iast_verse,
            self.original_source,
            self.author,
            self.context,
            self.translation,
            self.cited_in,
        ]
    }
}

pub static VERSES: &[DemoVerse] = &[
    DemoVerse {
        iast_verse: "*dharmakṣetre kurukṣetre*\n*samavetā yuyutsavaḥ*\n*māmakāḥ pāṇḍavāś caiva*\n*kim akurvata sañjaya*",
        original_source: "Bhagavad-gītā 1.1",
        author: "by Vyāsa",
        context: "Dhṛtarāṣṭra questions Sañjaya",
        translation: "Dhṛtarāṣṭra said: O Sañjaya, after my sons and the sons of Pāṇḍu assembled in the place of pilgrimage at Kurukṣetra, desiring to fight, what did they do?",
        cited_in: "Bhagavad-gītā As It Is by A.C. Bhaktivedanta Swami",
    },
    DemoVerse {
        iast_verse: "*sarva-dharmān parityajya*\n*māṁ ekaṁ śaraṇaṁ vraja*\n*ahaṁ tvāṁ sarva-pāpebhyo*\n*mokṣayiṣyāmi mā śucaḥ*",
        original_source: "Bhagavad-gītā 18.66",
        author: "Vyāsa",
        context: "Kṛṣṇa's final instruction to Arjuna",
        translation: "Abandon all varieties of religion and just surrender unto Me. I shall deliver you from all sinful reactions. Do not fear.",
        cited_in: "Bhagavad-gītā As It Is by A.C. Bhaktivedanta Swami",
    },
    DemoVerse {
        iast_verse: "*tṛṇād api sunīcena*\n*taror api sahiṣṇunā*\n*amāninā mānadena*\n*kīrtanīyaḥ sadā hariḥ*",
        original_source: "Śikṣāṣṭaka 3",
        author: "by Caitanya Mahāprabhu",
        context: "",
        translation: "One should chant the holy name in a humble state of mind, thinking oneself lower than the straw in the street.",
        cited_in: "Caitanya-caritāmṛta",
    },
    DemoVerse {
        iast_verse: "*oṁ pūrṇam adaḥ pūrṇam idaṁ*\n*pūrṇāt pūrṇam udacyate*\n*pūrṇasya pūrṇam ādāya*\n*pūrṇam evāvaśiṣyate*",
        original_source: "Īśopaniṣad, invocation",
        author: "",
        context: "",
        translation: "",
        cited_in: "",
    },
    DemoVerse {
        iast_verse: "vāg-arthāv iva sampṛktau vāg-artha-pratipattaye\njagataḥ pitarau vande pārvatī-parameśvarau",
        original_source: "Raghuvaṁśa 1.1",
        author: "Kālidāsa",
        context: "Opening invocation",
        translation: "I bow to Pārvatī and Parameśvara, the parents of the world, united like word and meaning.",
        cited_in: "Sanskrit Poetics Reader",
    },
];

/// `VERSES` as a comma-separated corpus file with a header row.
pub static DEMO_CSV: Lazy<String> = Lazy::new(|| {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS).expect("in-memory write");
    for verse in VERSES {
        writer.write_record(verse.fields()).expect("in-memory write");
    }
    let bytes = writer.into_inner().expect("in-memory flush");
    String::from_utf8(bytes).expect("fixture text is UTF-8")
});

/// First half of Bhagavad-gītā 1.1.
pub const OPENING_HALF_VERSE: &str = "dharmakṣetre kurukṣetre samavetā yuyutsavaḥ";

/// Letters absent from `OPENING_HALF_VERSE` once diacritics are removed.
const FILLER_LETTERS: &[u8] = b"bcfgjlnopqwxz";

/// `count` deterministic two-line verses built only from `FILLER_LETTERS`
/// and digits. The digits make every verse distinct.
pub fn filler_verses(count: usize) -> Vec<String> {
    let mut state: u64 = 0x5eed_1e55;
    let mut next = move |bound: usize| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % bound as u64) as usize
    };

    (0..count)
        .map(|i| {
            let mut line = |words: usize| -> String {
                (0..words)
                    .map(|_| {
                        let len = 3 + next(5);
                        (0..len)
                            .map(|_| FILLER_LETTERS[next(FILLER_LETTERS.len())] as char)
                            .collect::<String>()
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            let first = line(4);
            let second = line(4);
            format!("{first} {i}\n{second}")
        })
        .collect()
}
