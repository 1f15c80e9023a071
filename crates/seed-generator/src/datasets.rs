//! Bundled word lists. Entries within a list are distinct; unique generators
//! rely on it.

pub const FIRST_NAMES: &[&str] = &[
    "Aaron", "Abigail", "Adam", "Adrian", "Alice", "Amelia", "Andrew", "Anna", "Benjamin",
    "Bianca", "Caleb", "Camila", "Carlos", "Charlotte", "Chloe", "Daniel", "David", "Diana",
    "Dylan", "Elena", "Elijah", "Emily", "Emma", "Ethan", "Evelyn", "Felix", "Fiona", "Gabriel",
    "Grace", "Hannah", "Henry", "Isaac", "Isabella", "Jack", "James", "Julia", "Kevin", "Laura",
    "Leo", "Liam", "Lucas", "Lucy", "Maria", "Mason", "Mia", "Nathan", "Noah", "Nora", "Oliver",
    "Olivia", "Owen", "Paula", "Peter", "Quinn", "Rachel", "Ryan", "Samuel", "Sofia", "Thomas",
    "Victoria", "William", "Zoe",
];

pub const LAST_NAMES: &[&str] = &[
    "Adams", "Allen", "Anderson", "Baker", "Bennett", "Brooks", "Brown", "Campbell", "Carter",
    "Clark", "Collins", "Cook", "Cooper", "Davis", "Edwards", "Evans", "Fisher", "Foster",
    "Garcia", "Gray", "Green", "Hall", "Harris", "Hughes", "Jackson", "Johnson", "Jones", "Kelly",
    "King", "Lee", "Lewis", "Martin", "Miller", "Mitchell", "Moore", "Morgan", "Murphy", "Nelson",
    "Parker", "Perez", "Phillips", "Reed", "Roberts", "Robinson", "Rogers", "Scott", "Smith",
    "Stewart", "Taylor", "Thompson", "Turner", "Walker", "Ward", "Watson", "White", "Williams",
    "Wilson", "Wood", "Wright", "Young",
];

pub const COUNTRIES: &[&str] = &[
    "Argentina", "Australia", "Austria", "Belgium", "Brazil", "Bulgaria", "Canada", "Chile",
    "China", "Colombia", "Croatia", "Czechia", "Denmark", "Egypt", "Estonia", "Finland", "France",
    "Germany", "Greece", "Hungary", "Iceland", "India", "Indonesia", "Ireland", "Israel", "Italy",
    "Japan", "Kenya", "Latvia", "Lithuania", "Malaysia", "Mexico", "Morocco", "Netherlands",
    "New Zealand", "Nigeria", "Norway", "Peru", "Philippines", "Poland", "Portugal", "Romania",
    "Singapore", "Slovakia", "South Africa", "South Korea", "Spain", "Sweden", "Switzerland",
    "Thailand", "Turkey", "Ukraine", "United Kingdom", "United States", "Uruguay", "Vietnam",
];

pub const CITIES: &[&str] = &[
    "Amsterdam", "Athens", "Auckland", "Austin", "Bangkok", "Barcelona", "Berlin", "Bogota",
    "Boston", "Brussels", "Budapest", "Buenos Aires", "Cairo", "Chicago", "Copenhagen", "Dublin",
    "Edinburgh", "Florence", "Geneva", "Hamburg", "Helsinki", "Istanbul", "Jakarta", "Kyiv",
    "Lagos", "Lima", "Lisbon", "London", "Los Angeles", "Lyon", "Madrid", "Melbourne",
    "Mexico City", "Milan", "Montreal", "Mumbai", "Munich", "Nairobi", "Osaka", "Oslo", "Paris",
    "Porto", "Prague", "Riga", "Rome", "Santiago", "Seattle", "Seoul", "Singapore", "Stockholm",
    "Sydney", "Tallinn", "Tokyo", "Toronto", "Vancouver", "Vienna", "Vilnius", "Warsaw", "Zurich",
];

pub const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Pine", "Cedar", "Elm", "Birch", "Willow", "Chestnut", "Walnut", "Spruce",
    "Hill", "Lake", "River", "Park", "Forest", "Meadow", "Sunset", "Highland", "Church", "Mill",
    "Station", "Market", "Bridge", "Harbor", "Garden", "Orchard", "Spring", "Valley", "Ridge",
    "Main",
];

pub const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Road", "Lane", "Drive", "Court", "Place", "Boulevard", "Way", "Terrace",
];

pub const COMPANY_SUFFIXES: &[&str] = &[
    "Inc", "LLC", "Ltd", "Group", "Holdings", "Partners", "Labs", "Systems", "Solutions",
    "Industries",
];

pub const EMAIL_DOMAINS: &[&str] = &[
    "example.com", "example.org", "example.net", "mail.test", "inbox.test", "post.test",
];

pub const JOB_LEVELS: &[&str] = &[
    "Junior", "Senior", "Lead", "Principal", "Chief", "Associate", "Staff", "Head",
];

pub const JOB_AREAS: &[&str] = &[
    "Data", "Product", "Marketing", "Finance", "Security", "Infrastructure", "Research", "Sales",
    "Support", "Design",
];

pub const JOB_TYPES: &[&str] = &[
    "Engineer", "Analyst", "Manager", "Architect", "Consultant", "Designer", "Specialist",
    "Coordinator", "Officer", "Administrator",
];

pub const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];
