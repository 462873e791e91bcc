use crate::models::CatalogEntry;

/// Movies the simulated backend can match against.
pub const CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        id: "1",
        title: "The Matrix",
        poster_url: "https://image.tmdb.org/t/p/w500/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
        year: 1999,
        director: "Lana Wachowski, Lilly Wachowski",
        genre: "Sci-Fi, Action",
        description: "A computer programmer discovers a mysterious world of digital reality.",
        trailer_url: "https://www.youtube.com/watch?v=m8e-FF8MsqU",
        imdb_rating: 8.7,
        duration: "2h 16m",
    },
    CatalogEntry {
        id: "2",
        title: "Inception",
        poster_url: "https://image.tmdb.org/t/p/w500/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
        year: 2010,
        director: "Christopher Nolan",
        genre: "Sci-Fi, Thriller",
        description: "A thief who steals corporate secrets through dream-sharing technology.",
        trailer_url: "https://www.youtube.com/watch?v=YoHD9XEInc0",
        imdb_rating: 8.8,
        duration: "2h 28m",
    },
    CatalogEntry {
        id: "3",
        title: "Interstellar",
        poster_url: "https://image.tmdb.org/t/p/w500/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg",
        year: 2014,
        director: "Christopher Nolan",
        genre: "Sci-Fi, Drama",
        description: "A team of explorers travel through a wormhole in space.",
        trailer_url: "https://www.youtube.com/watch?v=2LqzF5WauAw",
        imdb_rating: 8.6,
        duration: "2h 49m",
    },
    CatalogEntry {
        id: "4",
        title: "The Dark Knight",
        poster_url: "https://image.tmdb.org/t/p/w500/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
        year: 2008,
        director: "Christopher Nolan",
        genre: "Action, Crime, Drama",
        description:
            "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham.",
        trailer_url: "https://www.youtube.com/watch?v=EXeTwQWrcwY",
        imdb_rating: 9.0,
        duration: "2h 32m",
    },
    CatalogEntry {
        id: "5",
        title: "Pulp Fiction",
        poster_url: "https://image.tmdb.org/t/p/w500/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg",
        year: 1994,
        director: "Quentin Tarantino",
        genre: "Crime, Drama",
        description: "The lives of two mob hitmen, a boxer, a gangster and his wife intertwine.",
        trailer_url: "https://www.youtube.com/watch?v=s7EdQ4FqbhY",
        imdb_rating: 8.9,
        duration: "2h 34m",
    },
];
