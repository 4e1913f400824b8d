use rand::Rng;

use crate::models::{PlaylistDraft, SongSuggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackSong {
    pub name: &'static str,
    pub artist: &'static str,
    pub mood: &'static str,
    pub reason: &'static str,
}

const fn song(
    name: &'static str,
    artist: &'static str,
    mood: &'static str,
    reason: &'static str,
) -> FallbackSong {
    FallbackSong {
        name,
        artist,
        mood,
        reason,
    }
}

const ENGLISH: &[FallbackSong] = &[
    song("Shape of You", "Ed Sheeran", "Pop", "Popular upbeat track"),
    song("Blinding Lights", "The Weeknd", "Synthpop", "Modern hit with retro vibes"),
    song("Watermelon Sugar", "Harry Styles", "Pop Rock", "Feel-good summer vibes"),
    song("Levitating", "Dua Lipa", "Dance Pop", "Energetic dance track"),
    song("Good 4 U", "Olivia Rodrigo", "Pop Punk", "Catchy alternative pop"),
    song("Stay", "The Kid LAROI, Justin Bieber", "Pop", "Contemporary hit"),
    song("Heat Waves", "Glass Animals", "Indie Pop", "Dreamy indie vibes"),
    song("As It Was", "Harry Styles", "Pop Rock", "Nostalgic modern classic"),
    song("Anti-Hero", "Taylor Swift", "Pop", "Introspective pop anthem"),
    song("Flowers", "Miley Cyrus", "Pop", "Empowering self-love anthem"),
    song("Unholy", "Sam Smith ft. Kim Petras", "Pop", "Bold contemporary sound"),
    song("Bad Habit", "Steve Lacy", "R&B", "Smooth R&B groove"),
    song("About Damn Time", "Lizzo", "Pop/R&B", "Feel-good confidence booster"),
    song("Running Up That Hill", "Kate Bush", "Art Pop", "Timeless artistic expression"),
    song("Golden", "Harry Styles", "Pop Rock", "Sunny optimistic track"),
    song("Drivers License", "Olivia Rodrigo", "Ballad", "Emotional storytelling"),
    song("Industry Baby", "Lil Nas X ft. Jack Harlow", "Hip Hop", "Confident rap anthem"),
    song("Peaches", "Justin Bieber", "R&B/Pop", "Smooth contemporary R&B"),
    song("Positions", "Ariana Grande", "R&B/Pop", "Sultry modern pop"),
    song("Willow", "Taylor Swift", "Folk Pop", "Mystical folk-inspired track"),
    song("Uptown Funk", "Mark Ronson ft. Bruno Mars", "Funk Pop", "Irresistible party groove"),
    song("Someone Like You", "Adele", "Ballad", "Heartfelt piano ballad"),
    song("Don't Start Now", "Dua Lipa", "Disco Pop", "Glossy disco energy"),
    song("Bad Guy", "Billie Eilish", "Alt Pop", "Dark minimalist pop"),
    song("Can't Stop the Feeling!", "Justin Timberlake", "Pop", "Pure feel-good pop"),
    song("Perfect", "Ed Sheeran", "Romantic", "Tender love song"),
    song("Eye of the Tiger", "Survivor", "Rock", "Classic motivation anthem"),
    song("Circles", "Post Malone", "Pop Rock", "Mellow melodic loop"),
    song("Sunflower", "Post Malone, Swae Lee", "Hip Hop", "Breezy crossover hit"),
    song("Mr. Brightside", "The Killers", "Indie Rock", "Sing-along rock staple"),
];

const HINDI: &[FallbackSong] = &[
    song("Kesariya", "Arijit Singh", "Romantic", "Beautiful romantic melody"),
    song("Apna Time Aayega", "DIVINE", "Hip Hop", "Motivational rap anthem"),
    song("Raabta", "Arijit Singh", "Romantic", "Soulful love song"),
    song("Jai Ho", "A.R. Rahman", "Celebratory", "Uplifting celebration song"),
    song("Tum Hi Ho", "Arijit Singh", "Romantic", "Emotional ballad"),
    song("Khairiyat", "Arijit Singh", "Romantic", "Heartfelt romantic track"),
    song("Dil Diyan Gallan", "Atif Aslam", "Romantic", "Melodic love song"),
    song("Vaaste", "Dhvani Bhanushali", "Pop", "Modern Hindi pop hit"),
    song("Bekhayali", "Sachet Tandon", "Sad", "Emotional heartbreak song"),
    song("Kalank", "Arijit Singh", "Dramatic", "Powerful dramatic number"),
    song("Malang", "Ved Sharma", "Romantic", "Contemporary romantic track"),
    song("Ghungroo", "Arijit Singh, Shilpa Rao", "Upbeat", "Energetic dance number"),
    song("Senorita", "Zindagi Na Milegi Dobara", "Fun", "Playful party track"),
    song("Nagada Sang Dhol", "Shreya Ghoshal", "Traditional", "Classical fusion piece"),
    song("Ae Watan", "Raazi Soundtrack", "Patriotic", "Inspiring patriotic song"),
    song("Kabira", "Tochi Raina, Rekha Bhardwaj", "Spiritual", "Soulful spiritual track"),
    song("Samjhawan", "Rahat Fateh Ali Khan", "Romantic", "Classic romantic melody"),
    song("Bulleya", "Papon", "Sufi", "Mystical Sufi composition"),
    song("Ishq Wala Love", "Salim Merchant", "Romantic", "Playful love song"),
    song("Kun Faya Kun", "A.R. Rahman", "Spiritual", "Divine spiritual experience"),
    song("Channa Mereya", "Arijit Singh", "Sad", "Bittersweet farewell ballad"),
    song("Kal Ho Naa Ho", "Sonu Nigam", "Emotional", "Timeless reflective classic"),
    song("Gallan Goodiyaan", "Shankar Mahadevan", "Celebratory", "Joyful family celebration"),
    song("Tere Bina", "A.R. Rahman", "Romantic", "Gentle longing melody"),
    song("Zinda", "Siddharth Mahadevan", "Energetic", "Driving training anthem"),
    song("Kar Har Maidaan Fateh", "Sukhwinder Singh, Shreya Ghoshal", "Motivational", "Rousing never-give-up song"),
    song("Badtameez Dil", "Benny Dayal", "Upbeat", "High-energy dance number"),
    song("Ilahi", "Arijit Singh", "Carefree", "Wanderlust travel song"),
    song("Agar Tum Saath Ho", "Alka Yagnik, Arijit Singh", "Emotional", "Aching duet"),
    song("London Thumakda", "Labh Janjua, Neha Kakkar", "Party", "Wedding dance floor filler"),
];

const GUJARATI: &[FallbackSong] = &[
    song("Chundadi Jaipur Si", "Kirtidan Gadhvi", "Folk", "Traditional Gujarati folk"),
    song("Rangilu Rajula", "Hemant Chauhan", "Devotional", "Spiritual devotional song"),
    song("Mari Heeriye", "Sachin-Jigar", "Folk Pop", "Modern Gujarati pop"),
    song("Holki Dhol Vage", "Kirtidan Gadhvi", "Festival", "Festive celebration song"),
    song("Khodiyar Maa", "Hemant Chauhan", "Devotional", "Popular devotional track"),
    song("Tame Aa Jao", "Jigardan Gadhavi", "Romantic", "Modern Gujarati romance"),
    song("Morli Gokul Ma", "Hemant Chauhan", "Devotional", "Krishna bhajan"),
    song("Dikri Aash Ni", "Kirtidan Gadhvi", "Emotional", "Touching family song"),
    song("Ame Gujarati", "Various Artists", "Pride", "Gujarati pride anthem"),
    song("Sanedo", "Traditional", "Folk", "Classic Gujarati folk dance"),
    song("Tara Vina Shyam", "Hemant Chauhan", "Devotional", "Beautiful Krishna song"),
    song("Radha Ne Shyam", "Jigardan Gadhavi", "Devotional", "Radha-Krishna love song"),
    song("Gujarati Garba", "Falguni Pathak", "Festival", "Traditional garba song"),
    song("Meldi Maa", "Hemant Chauhan", "Devotional", "Goddess devotional song"),
    song("Jogni Jogan", "Traditional", "Folk", "Traditional folk narrative"),
    song("Bhathiji Maharaj", "Hemant Chauhan", "Devotional", "Regional deity song"),
    song("Ambaji Maa", "Various Artists", "Devotional", "Goddess Amba prayer"),
    song("Kutch Ma Kyarek", "Regional Artists", "Folk", "Kutchi folk song"),
    song("Navratri Special", "Falguni Pathak", "Festival", "Nine nights celebration"),
    song("Gujarat Ni Aasmani", "Kirtidan Gadhvi", "Pride", "Gujarat tribute song"),
    song("Vhalam Aavo Ne", "Jigardan Gadhavi", "Romantic", "Soft modern love song"),
    song("Chaand Ne Kaho", "Sachin-Jigar", "Romantic", "Dreamy film melody"),
    song("Vagyo Re Dhol", "Bhoomi Trivedi", "Festival", "Thundering garba rhythm"),
    song("Moti Veraana", "Amit Trivedi, Osman Mir", "Festival", "Contemporary garba anthem"),
    song("Gori Radha Ne Kalo Kaan", "Kirtidan Gadhvi", "Devotional", "Beloved Krishna garba"),
    song("Pankhida", "Falguni Pathak", "Festival", "Navratri classic"),
    song("Halo Ne Aapna Malakma", "Traditional", "Folk", "Village folk celebration"),
    song("Nagar Nandji Na Lal", "Traditional", "Devotional", "Playful Krishna bhajan"),
    song("Mor Bani Thanghat Kare", "Aditi Paul", "Folk Pop", "Folk rhythm on the big screen"),
    song("Jay Adhya Shakti", "Traditional", "Devotional", "Evening aarti of Amba"),
];

/// Curated table for a language name. Unknown languages get the English table.
pub fn table_for(language: &str) -> &'static [FallbackSong] {
    match language.trim().to_ascii_lowercase().as_str() {
        "hindi" => HINDI,
        "gujarati" => GUJARATI,
        _ => ENGLISH,
    }
}

/// Draw up to `count` distinct songs from the language table.
pub fn pick_songs<R: Rng>(language: &str, count: usize, rng: &mut R) -> Vec<SongSuggestion> {
    let mut available: Vec<&FallbackSong> = table_for(language).iter().collect();
    let take = count.min(available.len());
    let mut picked = Vec::with_capacity(take);

    for _ in 0..take {
        let chosen = available.remove(rng.random_range(0..available.len()));
        picked.push(SongSuggestion {
            name: chosen.name.to_string(),
            artist: chosen.artist.to_string(),
            mood: Some(chosen.mood.to_string()),
            reason: Some(chosen.reason.to_string()),
        });
    }

    picked
}

/// Coarse mood label from English keywords in the prompt.
pub fn mood_from_prompt(prompt: &str) -> &'static str {
    const LEXICON: &[(&[&str], &str)] = &[
        (&["sad", "melancholy", "rain"], "Melancholic"),
        (&["happy", "upbeat", "party"], "Upbeat"),
        (&["love", "romantic"], "Romantic"),
        (&["workout", "gym", "energy"], "Energetic"),
        (&["chill", "relax"], "Chill"),
    ];

    let prompt = prompt.to_lowercase();
    LEXICON
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| prompt.contains(k)))
        .map(|(_, mood)| *mood)
        .unwrap_or("Mixed")
}

pub fn fallback_draft<R: Rng>(
    prompt: &str,
    language: &str,
    count: usize,
    rng: &mut R,
) -> PlaylistDraft {
    PlaylistDraft {
        playlist_name: format!("{} - {} Mix", prompt, language),
        description: format!("A curated {} playlist inspired by: {}", language, prompt),
        mood: Some(mood_from_prompt(prompt).to_string()),
        genre: Some("Mixed".to_string()),
        songs: pick_songs(language, count, rng),
    }
}
